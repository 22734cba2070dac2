//! Content-type detection over loosely spelled header maps.
//!
//! Headers may arrive in their wire spelling (`Content-Type`) or in the
//! environment spelling servers use (`CONTENT_TYPE`). Lookups walk an ordered
//! list of candidate keys, comparing each key case-insensitively.

/// Candidate spellings for the content-type key, in order of preference.
pub const CONTENT_TYPE_KEYS: [&str; 2] = ["Content-Type", "CONTENT_TYPE"];

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Find the first candidate key present in `entries`.
///
/// Earlier candidates win even if a later one appears first in `entries`.
/// Returns the key as spelled in `entries` together with its value.
pub fn lookup_header<'a, I>(entries: I, candidates: &[&str]) -> Option<(&'a str, &'a str)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let entries: Vec<(&str, &str)> = entries.into_iter().collect();
    candidates.iter().find_map(|candidate| {
        entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(candidate))
            .copied()
    })
}

/// Whether `value` is exactly `application/json`, ignoring case.
pub fn is_json_media_type(value: &str) -> bool {
    value.eq_ignore_ascii_case(CONTENT_TYPE_JSON)
}

/// Whether the entries declare a JSON body. Missing headers mean "not JSON".
pub fn json_content_type<'a, I>(entries: I) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    lookup_header(entries, &CONTENT_TYPE_KEYS)
        .map(|(_, value)| is_json_media_type(value))
        .unwrap_or(false)
}

/// Derive the length header key matching the spelling of a content-type key.
///
/// `Content-Type` becomes `Content-Length`, `CONTENT_TYPE` becomes
/// `CONTENT_LENGTH`, `content-type` becomes `content-length`.
pub fn length_key_for(content_type_key: &str) -> String {
    let split = content_type_key.len().saturating_sub("type".len());
    let (prefix, suffix) = match (
        content_type_key.get(..split),
        content_type_key.get(split..),
    ) {
        (Some(p), Some(s)) if s.eq_ignore_ascii_case("type") => (p, s),
        _ => return "Content-Length".to_string(),
    };

    let length = if suffix.chars().all(|c| c.is_ascii_uppercase()) {
        "LENGTH"
    } else if suffix.starts_with(|c: char| c.is_ascii_uppercase()) {
        "Length"
    } else {
        "length"
    };
    format!("{prefix}{length}")
}
