//! Runtime settings loader for the `wikirace` command.
//!
//! Settings come from one YAML file:
//! - `--conf <FILE>` when given
//! - otherwise `<config home>/wikirace/settings.yaml`, where the config home is
//!   `$WIKIRACE_CONFIG_HOME`, then `$XDG_CONFIG_HOME`, then `~/.config`
//!
//! Every field is optional. Later files overlay earlier ones field by field, and
//! command-line flags overlay the merged result.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const USER_SETTINGS_RELATIVE_PATH: &str = "wikirace/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

/// Merged contents of the settings files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeSettings {
    /// Where and how to query the wiki.
    #[serde(default)]
    pub mediawiki: MediaWikiSettings,
    /// Search behavior.
    #[serde(default)]
    pub search: SearchSettings,
}

/// `mediawiki:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaWikiSettings {
    /// `api.php` URL.
    pub endpoint: Option<String>,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
    /// Pipe-separated namespace ids.
    pub namespaces: Option<String>,
    /// Titles per request (at most 50).
    pub batch_size: Option<usize>,
    /// Per-request timeout.
    pub timeout_secs: Option<u64>,
}

/// `search:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchSettings {
    /// Overall deadline; `0` disables it.
    pub deadline_secs: Option<u64>,
    /// Extra titles never used as path nodes.
    pub denylist: Option<Vec<String>>,
    /// Keep the built-in authority-control denylist (default true).
    pub use_default_denylist: Option<bool>,
    /// Canonicalize the start/end titles through the wiki first (default true).
    pub resolve_titles: Option<bool>,
}

impl RuntimeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            mediawiki: self.mediawiki.merge(overlay.mediawiki),
            search: self.search.merge(overlay.search),
        }
    }
}

impl MediaWikiSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            endpoint: overlay.endpoint.or(self.endpoint),
            user_agent: overlay.user_agent.or(self.user_agent),
            namespaces: overlay.namespaces.or(self.namespaces),
            batch_size: overlay.batch_size.or(self.batch_size),
            timeout_secs: overlay.timeout_secs.or(self.timeout_secs),
        }
    }
}

impl SearchSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            deadline_secs: overlay.deadline_secs.or(self.deadline_secs),
            denylist: merge_denylists(self.denylist, overlay.denylist),
            use_default_denylist: overlay.use_default_denylist.or(self.use_default_denylist),
            resolve_titles: overlay.resolve_titles.or(self.resolve_titles),
        }
    }
}

fn merge_denylists(base: Option<Vec<String>>, overlay: Option<Vec<String>>) -> Option<Vec<String>> {
    match (base, overlay) {
        (None, None) => None,
        (Some(titles), None) | (None, Some(titles)) => Some(titles),
        (Some(mut titles), Some(overlay_titles)) => {
            for title in overlay_titles {
                if !titles.contains(&title) {
                    titles.push(title);
                }
            }
            Some(titles)
        }
    }
}

/// Load settings from `conf` if given, otherwise from the user settings file.
#[must_use]
pub fn load_runtime_settings(conf: Option<&Path>) -> RuntimeSettings {
    let paths: Vec<PathBuf> = match conf {
        Some(path) => {
            if !path.exists() {
                tracing::warn!(
                    event = "wikirace.settings.conf_missing",
                    path = %path.display(),
                    "settings file given with --conf not found; using defaults"
                );
            }
            vec![path.to_path_buf()]
        }
        None => user_settings_path().into_iter().collect(),
    };
    load_runtime_settings_from_paths(&paths)
}

/// Merge the files at `paths`, later over earlier. Missing, unreadable and
/// unparsable files contribute nothing.
#[must_use]
pub fn load_runtime_settings_from_paths(paths: &[PathBuf]) -> RuntimeSettings {
    paths
        .iter()
        .fold(RuntimeSettings::default(), |merged, path| {
            merged.merge(load_one(path))
        })
}

/// `<config home>/wikirace/settings.yaml` from the current environment.
#[must_use]
pub fn user_settings_path() -> Option<PathBuf> {
    user_settings_path_from(
        env_path("WIKIRACE_CONFIG_HOME"),
        env_path("XDG_CONFIG_HOME"),
        env_path("HOME"),
    )
}

fn user_settings_path_from(
    wikirace_home: Option<PathBuf>,
    xdg_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    let config_home = wikirace_home
        .or(xdg_home)
        .or_else(|| home.map(|home| home.join(DEFAULT_CONFIG_HOME_RELATIVE_PATH)))?;
    Some(config_home.join(USER_SETTINGS_RELATIVE_PATH))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn load_one(path: &Path) -> RuntimeSettings {
    if !path.exists() {
        tracing::debug!(
            event = "wikirace.settings.absent",
            path = %path.display(),
            "settings file not found; using defaults"
        );
        return RuntimeSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                event = "wikirace.settings.read_failed",
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RuntimeSettings::default();
        }
    };
    if raw.trim().is_empty() {
        return RuntimeSettings::default();
    }
    match serde_yaml::from_str::<RuntimeSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                event = "wikirace.settings.parse_failed",
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RuntimeSettings::default()
        }
    }
}
