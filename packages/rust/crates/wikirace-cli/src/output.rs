use anyhow::{Context, Result};
use serde::Serialize;
use wikirace_core::SearchReport;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct PathOutput<'a> {
    from: &'a str,
    to: &'a str,
    path: &'a [String],
    hops: usize,
    midpoint: &'a str,
    elapsed_ms: u128,
}

pub(crate) fn render(report: &SearchReport, output: OutputFormat) -> Result<String> {
    let value = PathOutput {
        from: report.path.first().map_or("", String::as_str),
        to: report.path.last().map_or("", String::as_str),
        path: &report.path,
        hops: report.hops(),
        midpoint: &report.midpoint,
        elapsed_ms: report.elapsed.as_millis(),
    };
    match output {
        OutputFormat::Text => Ok(report.path.join("\n")),
        OutputFormat::Json => {
            serde_json::to_string(&value).context("failed to serialize CLI output as JSON")
        }
        OutputFormat::Pretty => {
            serde_json::to_string_pretty(&value).context("failed to serialize CLI output as JSON")
        }
    }
}
