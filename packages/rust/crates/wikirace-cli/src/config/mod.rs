//! Config namespace: YAML runtime settings.

mod settings;

pub use settings::{
    MediaWikiSettings, RuntimeSettings, SearchSettings, load_runtime_settings,
    load_runtime_settings_from_paths, user_settings_path,
};
