//! Decoding of `action=query` responses.
//!
//! A links page looks like:
//!
//! ```json
//! {
//!   "continue": { "plcontinue": "736|0|Action-angle_variables", "continue": "||" },
//!   "query": {
//!     "pages": {
//!       "15580374": {
//!         "title": "Albert Einstein",
//!         "links": [ { "ns": 0, "title": "2dF Galaxy Redshift Survey" } ]
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! `continue` is present only while more results remain for the current titles.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;
use wikirace_core::{LinkMap, LinkSourceError};

use crate::query::LinkProp;

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default, rename = "continue")]
    continuation: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    query: Option<RawQuery>,
    #[serde(default)]
    error: Option<RawApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuery {
    #[serde(default)]
    pages: HashMap<String, RawPage>,
    #[serde(default)]
    normalized: Vec<RawRename>,
    #[serde(default)]
    redirects: Vec<RawRename>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    links: Vec<RawLink>,
    #[serde(default)]
    linkshere: Vec<RawLink>,
    #[serde(default)]
    missing: Option<Value>,
    #[serde(default)]
    invalid: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawRename {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct RawApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

/// Parameters to send back to resume a paginated query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Continuation {
    params: BTreeMap<String, String>,
}

impl Continuation {
    /// Value of the module-specific token, e.g. `plcontinue`.
    #[must_use]
    pub fn token(&self, prop: LinkProp) -> Option<&str> {
        self.params.get(&prop.param("continue")).map(String::as_str)
    }

    /// All `(key, value)` pairs to append to the next request.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// One decoded links response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinksPage {
    /// Links found in this response, keyed by the queried page's title.
    pub links: LinkMap,
    /// Present when another request is needed for the same titles.
    pub continuation: Option<Continuation>,
}

/// Decode a `prop=links`/`prop=linkshere` response body.
///
/// # Errors
/// [`LinkSourceError::Malformed`] for bodies that are not the expected JSON shape,
/// [`LinkSourceError::Api`] when the API reports an error object.
pub fn parse_links_response(body: &str, prop: LinkProp) -> Result<LinksPage, LinkSourceError> {
    let raw = decode(body)?;

    let continuation = raw
        .continuation
        .map(|params| Continuation {
            params: params
                .into_iter()
                .map(|(key, value)| (key, value_to_string(value)))
                .collect(),
        })
        .filter(|continuation| continuation.token(prop).is_some());

    let query = raw.query.unwrap_or_default();
    // Pages come back under canonical titles; key them by the title as queried.
    let queried_as: HashMap<&str, &str> = query
        .normalized
        .iter()
        .map(|rename| (rename.to.as_str(), rename.from.as_str()))
        .collect();

    let mut links = LinkMap::new();
    for page in query.pages.values() {
        if page.title.is_empty() {
            continue;
        }
        let queried = queried_as
            .get(page.title.as_str())
            .copied()
            .unwrap_or(page.title.as_str());
        let entries = match prop.prop {
            "linkshere" => &page.linkshere,
            _ => &page.links,
        };
        for entry in entries {
            links.add(queried, entry.title.as_str());
        }
    }

    Ok(LinksPage {
        links,
        continuation,
    })
}

/// Decode a `redirects=1` title lookup for `requested`: the canonical title, or
/// `None` when the page does not exist.
///
/// # Errors
/// Same as [`parse_links_response`].
pub fn parse_resolved_title(
    body: &str,
    requested: &str,
) -> Result<Option<String>, LinkSourceError> {
    let query = decode(body)?.query.unwrap_or_default();

    let mut title = requested.to_string();
    if let Some(rename) = query.normalized.iter().find(|rename| rename.from == title) {
        title.clone_from(&rename.to);
    }
    // Redirect chains are resolved server-side; a double redirect still lists hops.
    for _ in 0..query.redirects.len() {
        match query.redirects.iter().find(|rename| rename.from == title) {
            Some(rename) => title.clone_from(&rename.to),
            None => break,
        }
    }

    let exists = query
        .pages
        .values()
        .find(|page| page.title == title)
        .is_some_and(|page| page.missing.is_none() && page.invalid.is_none());
    Ok(exists.then_some(title))
}

fn decode(body: &str) -> Result<RawResponse, LinkSourceError> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|error| LinkSourceError::Malformed(error.to_string()))?;
    if let Some(error) = raw.error {
        return Err(LinkSourceError::Api {
            code: error.code,
            info: error.info,
        });
    }
    Ok(raw)
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
