//! Effective run options: built-in defaults, then settings, then flags.

use std::time::Duration;

use wikirace_cli::RuntimeSettings;
use wikirace_core::{Denylist, SearchOptions, normalize_title};
use wikirace_mediawiki::MediaWikiConfig;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub(crate) mediawiki: MediaWikiConfig,
    pub(crate) search: SearchOptions,
    pub(crate) resolve_titles: bool,
}

impl RunOptions {
    pub(crate) fn from_sources(cli: &Cli, settings: RuntimeSettings) -> Self {
        let RuntimeSettings { mediawiki, search } = settings;

        let mut config = MediaWikiConfig::default();
        if let Some(endpoint) = cli.endpoint.clone().or(mediawiki.endpoint) {
            config.endpoint = endpoint;
        }
        if let Some(user_agent) = mediawiki.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(namespaces) = mediawiki.namespaces {
            config.namespaces = namespaces;
        }
        if let Some(batch_size) = mediawiki.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(timeout_secs) = cli.timeout_secs.or(mediawiki.timeout_secs) {
            config.timeout_secs = timeout_secs;
        }

        let use_default = !cli.no_default_denylist && search.use_default_denylist.unwrap_or(true);
        let mut denylist = if use_default {
            Denylist::default()
        } else {
            Denylist::empty()
        };
        denylist.extend(
            search
                .denylist
                .unwrap_or_default()
                .iter()
                .chain(&cli.deny)
                .map(|title| normalize_title(title)),
        );

        let deadline = cli
            .deadline_secs
            .or(search.deadline_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            mediawiki: config,
            search: SearchOptions { denylist, deadline },
            resolve_titles: !cli.no_resolve && search.resolve_titles.unwrap_or(true),
        }
    }
}
