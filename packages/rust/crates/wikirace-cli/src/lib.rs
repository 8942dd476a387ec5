//! Support library for the `wikirace` command: settings loading.

mod config;

pub use config::{
    MediaWikiSettings, RuntimeSettings, SearchSettings, load_runtime_settings,
    load_runtime_settings_from_paths, user_settings_path,
};
