//! Watched-history filtering module
//!
//! Hides search results the user has already watched and enforces the
//! display limit.

use crate::aggregator::SearchResult;
use crate::watch_history::WatchedTitleSet;

/// Results selected for display, plus what the watched filter removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredResults {
    /// Results to show, at most `limit` of them
    pub shown: Vec<SearchResult>,
    /// Titles of results removed because they were already watched
    pub filtered_titles: Vec<String>,
}

impl FilteredResults {
    /// Number of results removed by the watched filter
    pub fn filtered_count(&self) -> usize {
        self.filtered_titles.len()
    }
}

/// Selects results for display
///
/// Results are examined in order until `limit` results have been selected.
/// When a watched set is given, results whose title equals a watched title
/// (ignoring case) are skipped and recorded instead; they do not count
/// towards the limit. Results after the limit is reached are not examined.
pub fn select_for_display(
    results: Vec<SearchResult>,
    watched: Option<&WatchedTitleSet>,
    limit: usize,
) -> FilteredResults {
    let mut selected = FilteredResults::default();

    for result in results {
        if selected.shown.len() >= limit {
            break;
        }

        if let Some(watched) = watched {
            if watched.contains_title(result.title()) {
                selected.filtered_titles.push(result.title().to_string());
                continue;
            }
        }

        selected.shown.push(result);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::tests::movie;
    use crate::relevance::MatchKind;

    fn result(id: u64, title: &str) -> SearchResult {
        SearchResult {
            item: movie(id, title, "", ""),
            kind: MatchKind::TitleMatch,
            synopsis: String::new(),
        }
    }

    fn titles(selected: &FilteredResults) -> Vec<&str> {
        selected.shown.iter().map(SearchResult::title).collect()
    }

    #[test]
    fn test_limit_without_history() {
        let results = vec![result(1, "A"), result(2, "B"), result(3, "C")];
        let selected = select_for_display(results, None, 2);
        assert_eq!(titles(&selected), vec!["A", "B"]);
        assert_eq!(selected.filtered_count(), 0);
    }

    #[test]
    fn test_exact_match_only() {
        let watched: WatchedTitleSet = ["The Matrix".to_string()].into_iter().collect();
        let results = vec![result(1, "The Matrix Reloaded"), result(2, "THE MATRIX")];

        let selected = select_for_display(results, Some(&watched), 20);
        assert_eq!(titles(&selected), vec!["The Matrix Reloaded"]);
        assert_eq!(selected.filtered_titles, vec!["THE MATRIX"]);
    }

    #[test]
    fn test_case_insensitive_equality() {
        let watched: WatchedTitleSet = ["the matrix reloaded".to_string()].into_iter().collect();
        let selected =
            select_for_display(vec![result(1, "The Matrix Reloaded")], Some(&watched), 20);
        assert!(selected.shown.is_empty());
        assert_eq!(selected.filtered_count(), 1);
    }

    #[test]
    fn test_filtered_results_do_not_count_towards_limit() {
        let watched: WatchedTitleSet = ["A".to_string(), "C".to_string(), "E".to_string()]
            .into_iter()
            .collect();
        let results = vec![
            result(1, "A"),
            result(2, "B"),
            result(3, "C"),
            result(4, "D"),
            result(5, "E"),
        ];

        let selected = select_for_display(results, Some(&watched), 2);
        assert_eq!(titles(&selected), vec!["B", "D"]);
        // "E" lies beyond the limit and is never examined.
        assert_eq!(selected.filtered_titles, vec!["A", "C"]);
    }

    #[test]
    fn test_zero_limit_shows_nothing() {
        let selected = select_for_display(vec![result(1, "A")], None, 0);
        assert!(selected.shown.is_empty());
    }
}
