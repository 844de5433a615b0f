//! Mention text normalization
//!
//! Two forms are derived from a raw mention:
//! - the lookup key: trimmed, line breaks replaced by spaces
//! - the node local name: lookup key in NFC, spaces as underscores, percent-encoded

use unicode_normalization::UnicodeNormalization;

/// Normalize mention text for lookup and caching.
///
/// # Examples
///
/// ```
/// use entity_graph::resolver::normalize_mention;
///
/// assert_eq!(normalize_mention("  Fyodor\nDostoevsky "), "Fyodor Dostoevsky");
/// assert_eq!(normalize_mention(" \n "), "");
/// ```
pub fn normalize_mention(text: &str) -> String {
    text.trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Deterministic IRI local name for a mention.
///
/// Mentions with identical normalized text share a local name, so they
/// collapse onto one graph node.
pub fn node_local_name(text: &str) -> String {
    let composed: String = normalize_mention(text).nfc().collect();
    urlencoding::encode(&composed.replace(' ', "_")).into_owned()
}
