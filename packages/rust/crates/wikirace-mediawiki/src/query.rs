//! Query URL construction for `prop=links` / `prop=linkshere`.

use reqwest::Url;
use wikirace_core::{LinkDirection, LinkSourceError};

use crate::response::Continuation;

/// The API property module answering one link direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkProp {
    /// Parameter prefix of the module (`pl`, `lh`).
    pub prefix: &'static str,
    /// `prop=` value and key of the per-page result array.
    pub prop: &'static str,
}

impl LinkProp {
    /// `links` for outgoing, `linkshere` for incoming.
    #[must_use]
    pub fn for_direction(direction: LinkDirection) -> Self {
        match direction {
            LinkDirection::Outgoing => Self {
                prefix: "pl",
                prop: "links",
            },
            LinkDirection::Incoming => Self {
                prefix: "lh",
                prop: "linkshere",
            },
        }
    }

    /// Name of a prefixed parameter, e.g. `plcontinue`.
    #[must_use]
    pub fn param(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }
}

/// Split `titles` into consecutive chunks of at most `max` (minimum 1).
#[must_use]
pub fn batch(titles: &[String], max: usize) -> Vec<Vec<String>> {
    titles.chunks(max.max(1)).map(<[String]>::to_vec).collect()
}

/// URL fetching `prop`'s links of `titles`, resuming at `continuation` if given.
///
/// # Errors
/// Returns [`LinkSourceError::Request`] when `endpoint` is not a valid URL.
pub fn build_query_url(
    endpoint: &str,
    prop: LinkProp,
    namespaces: &str,
    titles: &[String],
    continuation: Option<&Continuation>,
) -> Result<Url, LinkSourceError> {
    let mut params: Vec<(String, String)> = vec![
        ("format".to_string(), "json".to_string()),
        ("action".to_string(), "query".to_string()),
        ("titles".to_string(), titles.join("|")),
        ("prop".to_string(), prop.prop.to_string()),
        (prop.param("namespace"), namespaces.to_string()),
        (prop.param("limit"), "max".to_string()),
    ];
    if let Some(continuation) = continuation {
        params.extend(
            continuation
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
    }
    Url::parse_with_params(endpoint, &params)
        .map_err(|error| invalid_endpoint(endpoint, &error))
}

/// URL resolving `title` through normalization and redirects.
///
/// # Errors
/// Returns [`LinkSourceError::Request`] when `endpoint` is not a valid URL.
pub fn build_resolve_url(endpoint: &str, title: &str) -> Result<Url, LinkSourceError> {
    Url::parse_with_params(
        endpoint,
        &[
            ("format", "json"),
            ("action", "query"),
            ("titles", title),
            ("redirects", "1"),
        ],
    )
    .map_err(|error| invalid_endpoint(endpoint, &error))
}

fn invalid_endpoint(endpoint: &str, error: &impl std::fmt::Display) -> LinkSourceError {
    LinkSourceError::Request(format!("invalid endpoint {endpoint:?}: {error}"))
}
