//! Synopsis highlighting module
//!
//! This module emphasizes the part of a synopsis that made it match a query,
//! so description-only matches show at a glance why they were returned.

use crate::relevance::{Query, synopsis_words};
use std::ops::Range;

/// Decoration inserted before the emphasized span (bold, bright red)
pub const EMPHASIS_START: &str = "\x1b[1m\x1b[91m";

/// Decoration inserted right after the emphasized span
pub const EMPHASIS_END: &str = "\x1b[0m";

/// Query words this short are never emphasized on their own
const MIN_HIGHLIGHT_WORD_LEN: usize = 3;

/// Returns a copy of the synopsis with the first matched span emphasized
///
/// At most one span is emphasized; all other text is left untouched. When
/// nothing matches, the synopsis is returned unmodified.
///
/// # Examples
///
/// ```
/// use watch_search::{highlight, Query, EMPHASIS_START, EMPHASIS_END};
///
/// let out = highlight("A young Dragon rider", &Query::new("dragon"));
/// assert_eq!(out, format!("A young {EMPHASIS_START}Dragon{EMPHASIS_END} rider"));
/// ```
pub fn highlight(synopsis: &str, query: &Query) -> String {
    match find_span(synopsis, query) {
        Some(span) => format!(
            "{}{}{}{}{}",
            &synopsis[..span.start],
            EMPHASIS_START,
            &synopsis[span.clone()],
            EMPHASIS_END,
            &synopsis[span.end..]
        ),
        None => synopsis.to_string(),
    }
}

/// Locates the span to emphasize as a byte range of the original synopsis
///
/// The rules are tried in order and the first hit wins:
/// the whole query, then each long enough query word, then the first
/// synopsis word that overlaps with a long enough query word.
pub fn find_span(synopsis: &str, query: &Query) -> Option<Range<usize>> {
    if let Some(span) = find_folded(synopsis, query.folded()) {
        return Some(span);
    }

    let long_tokens: Vec<&str> = query
        .tokens()
        .iter()
        .map(String::as_str)
        .filter(|token| token.chars().count() >= MIN_HIGHLIGHT_WORD_LEN)
        .collect();

    for token in &long_tokens {
        if let Some(span) = find_folded(synopsis, token) {
            return Some(span);
        }
    }

    // Punctuation-only words strip to nothing and have no span to emphasize.
    let folded = synopsis.to_lowercase();
    for word in synopsis_words(&folded).filter(|word| !word.is_empty()) {
        for token in &long_tokens {
            if token.contains(word) || word.contains(token) {
                if let Some(span) = find_folded(synopsis, word) {
                    return Some(span);
                }
            }
        }
    }

    None
}

/// Text around the first whole-query occurrence, up to `radius` characters
/// on each side
///
/// Returns None when the whole query does not occur in the synopsis.
pub fn match_context<'a>(synopsis: &'a str, query: &Query, radius: usize) -> Option<&'a str> {
    let span = find_folded(synopsis, query.folded())?;

    let start = synopsis[..span.start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(span.start, |(offset, _)| offset);
    let end = span.end
        + synopsis[span.end..]
            .chars()
            .take(radius)
            .map(char::len_utf8)
            .sum::<usize>();

    Some(&synopsis[start..end])
}

/// Removes emphasis decorations, restoring the undecorated text
pub fn strip_emphasis(text: &str) -> String {
    text.replace(EMPHASIS_START, "").replace(EMPHASIS_END, "")
}

/// Finds the first occurrence of an already lower-cased needle
///
/// The haystack is folded character by character, so the returned range
/// always lies on character boundaries of the original text.
fn find_folded(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    haystack
        .char_indices()
        .find_map(|(start, _)| match_folded_at(haystack, start, needle).map(|end| start..end))
}

/// Returns the end offset if the folded haystack starts with the needle at `start`
fn match_folded_at(haystack: &str, start: usize, needle: &str) -> Option<usize> {
    let mut expected = needle.chars().peekable();

    for (offset, c) in haystack[start..].char_indices() {
        for lower in c.to_lowercase() {
            if expected.next() != Some(lower) {
                return None;
            }
        }
        if expected.peek().is_none() {
            return Some(start + offset + c.len_utf8());
        }
    }

    None
}
