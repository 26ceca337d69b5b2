use std::collections::{HashMap, HashSet};
use regex::{Captures, Regex};
use lazy_static::lazy_static;


lazy_static! {
    static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\[.*?\]\}").unwrap();
}

#[inline]
fn strip_format(key: &str) -> &str {
    //! Strips "{\[" and "\]}" from a matched placeholder like "{\[a\]}".
    &key[2..key.len() - 2]
}

/// Replaces every placeholder in `template` with its bound value in a single pass.
///
/// Replacement values are never scanned again, so a value that itself looks like `{[x]}` stays verbatim.
/// Placeholders without a binding are left untouched.
pub(crate) fn replace_all_placeholders(template: &str, mapping: &HashMap<String, String>) -> String {
    PLACEHOLDER_MATCH_RE
        .replace_all(template, |captures: &Captures| {
            let match_text = &captures[0];
            match mapping.get(strip_format(match_text)) {
                Some(value) => value.clone(),
                None => match_text.to_string(),
            }
        })
        .into_owned()
}

/// Collects the names of all placeholders in a string.
pub fn get_placeholders(string: &str) -> HashSet<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .map(|captures| strip_format(&captures[0]).to_string())
        .collect()
}
