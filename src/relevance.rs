//! Relevance matching module
//!
//! This module decides whether a catalog entry satisfies a free-text query,
//! either through its title or through its synopsis, and classifies the match.

/// Characters trimmed from both ends of a synopsis word before comparison
pub(crate) const WORD_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ':', ';', '(', ')', '[', ']', '{', '}', '"', '\'', '-',
];

/// Share of query words that must overlap with the synopsis, in tenths
const OVERLAP_TENTHS: usize = 7;

/// How a catalog item relates to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Neither the title nor the synopsis matches
    NoMatch,
    /// The query appears in the title
    TitleMatch,
    /// The query appears only in the synopsis
    DescriptionOnly,
}

impl MatchKind {
    /// Returns true for every classification except `NoMatch`
    pub fn is_match(self) -> bool {
        !matches!(self, MatchKind::NoMatch)
    }
}

/// A case-folded search query and its whitespace-separated words
///
/// Words keep their query order and may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    folded: String,
    tokens: Vec<String>,
}

impl Query {
    /// Normalizes a raw query string
    pub fn new(query: &str) -> Self {
        let folded = query.to_lowercase();
        let tokens = folded.split_whitespace().map(str::to_string).collect();
        Self { folded, tokens }
    }

    /// The whole query, lower-cased
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// The lower-cased query words in query order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Checks whether any query word, or the whole query, occurs in the title
    ///
    /// An absent or empty title never matches.
    pub fn title_matches(&self, title: Option<&str>) -> bool {
        let Some(title) = title.filter(|t| !t.is_empty()) else {
            return false;
        };
        let title = title.to_lowercase();

        self.tokens.iter().any(|token| title.contains(token.as_str()))
            || title.contains(&self.folded)
    }

    /// Counts the query words overlapping with at least one synopsis word
    ///
    /// A word overlaps when either one is a substring of the other. A
    /// synopsis word made only of punctuation strips to the empty string and
    /// therefore overlaps every query word.
    pub fn overlap_count(&self, synopsis: &str) -> usize {
        let folded = synopsis.to_lowercase();
        let words: Vec<&str> = synopsis_words(&folded).collect();

        self.tokens
            .iter()
            .filter(|token| {
                words
                    .iter()
                    .any(|word| token.contains(word) || word.contains(token.as_str()))
            })
            .count()
    }

    /// Checks whether the synopsis satisfies the query
    ///
    /// Single-word queries need a direct substring hit. Longer queries match
    /// on a direct hit of the whole query or when enough words overlap
    /// (see [`overlap_threshold`]). An absent or empty synopsis never matches.
    pub fn description_matches(&self, synopsis: Option<&str>) -> bool {
        let Some(synopsis) = synopsis.filter(|s| !s.is_empty()) else {
            return false;
        };
        let folded = synopsis.to_lowercase();
        let direct_match = folded.contains(&self.folded);

        if let [token] = self.tokens.as_slice() {
            return direct_match || folded.contains(token.as_str());
        }

        direct_match || self.overlap_count(synopsis) >= overlap_threshold(self.tokens.len())
    }

    /// Classifies an item by its title and synopsis
    pub fn classify(&self, title: Option<&str>, synopsis: Option<&str>) -> MatchKind {
        if self.title_matches(title) {
            MatchKind::TitleMatch
        } else if self.description_matches(synopsis) {
            MatchKind::DescriptionOnly
        } else {
            MatchKind::NoMatch
        }
    }
}

/// Minimum number of overlapping words for a multi-word description match
///
/// This is 70% of the word count rounded up, and never less than one.
pub fn overlap_threshold(token_count: usize) -> usize {
    (token_count * OVERLAP_TENTHS).div_ceil(10).max(1)
}

/// Splits lower-cased synopsis text into punctuation-stripped words
///
/// Words that consist only of punctuation come out empty.
pub(crate) fn synopsis_words(folded: &str) -> impl Iterator<Item = &str> {
    folded
        .split_whitespace()
        .map(|word| word.trim_matches(WORD_PUNCTUATION))
}
