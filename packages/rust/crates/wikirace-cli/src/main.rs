//! `wikirace`: find a chain of links between two Wikipedia articles.
//!
//! Logging: `-d/--debug` logs each generation and discovered link to stderr;
//! `RUST_LOG` overrides the filter entirely.
//!
//! Exit status: 0 path found, 2 invalid input or usage, 3 no path exists,
//! 4 the wiki could not be queried, 5 deadline exceeded, 1 anything else.

mod cli;
mod options;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wikirace_cli::load_runtime_settings;
use wikirace_core::{BidirectionalSearch, LinkSource, LinkSourceError, SearchError, normalize_title};
use wikirace_mediawiki::MediaWikiClient;

use crate::cli::Cli;
use crate::options::RunOptions;

const DEBUG_FILTER: &str =
    "wikirace=debug,wikirace_cli=debug,wikirace_core=debug,wikirace_mediawiki=debug";
const DEFAULT_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.debug {
            DEBUG_FILTER
        } else {
            DEFAULT_FILTER
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&cli).await {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("wikirace: {error:#}");
            exit_code_for(&error)
        }
    }
}

async fn run(cli: &Cli) -> Result<String> {
    let settings = load_runtime_settings(cli.config_file.as_deref());
    let options = RunOptions::from_sources(cli, settings);

    let from = normalize_title(&cli.from);
    let to = normalize_title(&cli.to);
    if from.is_empty() || to.is_empty() {
        return Err(SearchError::InvalidInput(
            "start and end titles must not be blank".to_string(),
        )
        .into());
    }

    let client = Arc::new(MediaWikiClient::new(options.mediawiki)?);
    let (from, to) = if options.resolve_titles && from != to {
        (
            resolve(client.as_ref(), &from).await?,
            resolve(client.as_ref(), &to).await?,
        )
    } else {
        (from, to)
    };

    let search = BidirectionalSearch::with_options(client, options.search);
    let report = search.search_with_report(&from, &to).await?;
    tracing::info!(
        event = "wikirace.search.completed",
        hops = report.hops(),
        midpoint = report.midpoint.as_str(),
        forward_generations = report.forward.generations,
        backward_generations = report.backward.generations,
        recorded = report.forward.recorded + report.backward.recorded,
        elapsed_ms = report.elapsed.as_millis(),
        "path found"
    );
    output::render(&report, cli.output)
}

async fn resolve<S: LinkSource + ?Sized>(source: &S, title: &str) -> Result<String> {
    let resolved = source
        .resolve_title(title)
        .await
        .map_err(SearchError::from)?
        .ok_or_else(|| SearchError::InvalidInput(format!("no article titled {title:?}")))?;
    if resolved != title {
        tracing::info!(
            event = "wikirace.title.resolved",
            requested = title,
            resolved = resolved.as_str(),
            "following redirect"
        );
    }
    Ok(resolved)
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(error) = error.downcast_ref::<SearchError>() {
        return match error {
            SearchError::InvalidInput(_) => ExitCode::from(2),
            SearchError::NoPathFound { .. } => ExitCode::from(3),
            SearchError::SourceUnavailable(_) => ExitCode::from(4),
            SearchError::DeadlineExceeded(_) => ExitCode::from(5),
            SearchError::Internal(_) => ExitCode::FAILURE,
        };
    }
    if error.downcast_ref::<LinkSourceError>().is_some() {
        return ExitCode::from(4);
    }
    ExitCode::FAILURE
}
