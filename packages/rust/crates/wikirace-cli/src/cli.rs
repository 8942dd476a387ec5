use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "wikirace",
    version,
    about = "Find a short chain of links between two Wikipedia articles"
)]
pub(crate) struct Cli {
    /// Title of the article to start from.
    pub(crate) from: String,

    /// Title of the article to reach.
    pub(crate) to: String,

    /// Log every generation and discovered link to stderr (`RUST_LOG` overrides).
    #[arg(long, short = 'd')]
    pub(crate) debug: bool,

    /// Settings YAML file, instead of `<config home>/wikirace/settings.yaml`.
    #[arg(long = "conf", short = 'c', value_name = "FILE")]
    pub(crate) config_file: Option<PathBuf>,

    /// MediaWiki `api.php` URL.
    #[arg(long, value_name = "URL")]
    pub(crate) endpoint: Option<String>,

    /// Per-request timeout.
    #[arg(long, value_name = "SECS")]
    pub(crate) timeout_secs: Option<u64>,

    /// Give up after this long (`0` waits indefinitely).
    #[arg(long, value_name = "SECS")]
    pub(crate) deadline_secs: Option<u64>,

    /// Never route through this article (repeatable).
    #[arg(long = "deny", value_name = "TITLE")]
    pub(crate) deny: Vec<String>,

    /// Drop the built-in authority-control denylist.
    #[arg(long)]
    pub(crate) no_default_denylist: bool,

    /// Use the titles as given instead of following redirects first.
    #[arg(long)]
    pub(crate) no_resolve: bool,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One title per line.
    Text,
    /// Compact JSON object with the path and a summary.
    Json,
    /// Indented JSON object with the path and a summary.
    Pretty,
}
