//! Edge filtering applied before anything is recorded into a frontier.

use std::collections::BTreeSet;

/// Authority-control pages that nearly every article links to. Paths through them
/// are technically valid but make for useless race results.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "Bibliothèque nationale de France",
    "Digital object identifier",
    "Integrated Authority File",
    "International Standard Book Number",
    "International Standard Name Identifier",
    "Library of Congress Control Number",
    "MusicBrainz",
    "National Diet Library",
    "Virtual International Authority File",
];

/// Set of "boring" titles whose edges are discarded in both search directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    titles: BTreeSet<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::from_titles(DEFAULT_DENYLIST.iter().copied())
    }
}

impl Denylist {
    /// Denylist with no entries; only self-loops are rejected.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            titles: BTreeSet::new(),
        }
    }

    /// Build a denylist from arbitrary titles. Blank entries are skipped.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::empty();
        list.extend(titles);
        list
    }

    /// Add more titles.
    pub fn extend<I, S>(&mut self, titles: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.titles.extend(
            titles
                .into_iter()
                .map(|title| title.as_ref().trim().to_string())
                .filter(|title| !title.is_empty()),
        );
    }

    /// Whether `title` is denylisted.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Whether the edge `from -> to` may be recorded: not a self-loop and neither
    /// endpoint denylisted.
    #[must_use]
    pub fn admits(&self, from: &str, to: &str) -> bool {
        from != to && !self.contains(from) && !self.contains(to)
    }

    /// Number of denylisted titles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// True when nothing is denylisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Denylisted titles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}
