//! Page title normalization.

/// Normalize a user-supplied page title the way MediaWiki does for display titles:
/// underscores become spaces, whitespace runs collapse, and the first letter is
/// upper-cased. Returns an empty string for blank input.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
