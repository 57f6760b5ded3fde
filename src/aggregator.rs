//! Catalog result aggregation module
//!
//! The provider's search endpoint only looks at titles. To also find titles
//! whose synopsis mentions the query, the direct search results are pooled
//! with several pages of curated listings, de-duplicated, and every
//! candidate is run through the relevance matcher.

use crate::ProgressEvent;
use crate::highlight::highlight;
use crate::metadata_retrieval::{
    CatalogItem, CatalogProvider, Listing, MediaType, MetadataRetrievalError,
};
use crate::relevance::{MatchKind, Query};
use std::collections::HashSet;
use std::fmt;

/// Number of direct search pages fetched at most
pub const SEARCH_PAGES: u32 = 5;

/// Placeholder shown for items without a synopsis
pub const NO_SYNOPSIS: &str = "No overview available";

/// One request contributing candidates to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Titles first released in the filter year
    Discover { year: i32 },
    /// A page of the direct text search
    Search { page: u32 },
    /// A page of a curated listing
    Listing { listing: Listing, page: u32 },
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Discover { year } => write!(f, "discover {}", year),
            CandidateSource::Search { page } => write!(f, "search page {}", page),
            CandidateSource::Listing { listing, page } => {
                write!(f, "{} page {}", listing, page)
            }
        }
    }
}

/// The outcome of fetching a single candidate source
///
/// A failed source contributes no candidates; the others are unaffected.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: CandidateSource,
    pub result: Result<Vec<CatalogItem>, MetadataRetrievalError>,
}

/// A catalog item that matched the query, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub item: CatalogItem,
    /// Either `TitleMatch` or `DescriptionOnly`
    pub kind: MatchKind,
    /// Truncated synopsis, highlighted for description-only matches
    pub synopsis: String,
}

impl SearchResult {
    /// The item's title, or an empty string when the provider sent none
    pub fn title(&self) -> &str {
        self.item.title.as_deref().unwrap_or_default()
    }
}

/// Fetches every candidate source for one media type
///
/// Sources are fetched in pool order: the year discovery (only with a year
/// filter), the direct search pages, then the listing sweep. Search paging
/// stops early once a page comes back empty.
pub fn collect_sources<P, F>(
    provider: &P,
    media_type: MediaType,
    query: &str,
    year: Option<i32>,
    mut progress_callback: F,
) -> Vec<SourceOutcome>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    let mut outcomes = Vec::new();
    let mut record = |outcome: SourceOutcome, outcomes: &mut Vec<SourceOutcome>| {
        match &outcome.result {
            Ok(items) => progress_callback(ProgressEvent::SourceFetched {
                media_type,
                source: outcome.source,
                count: items.len(),
            }),
            Err(error) => progress_callback(ProgressEvent::SourceFailed {
                media_type,
                source: outcome.source,
                error: error.to_string(),
            }),
        }
        outcomes.push(outcome);
    };

    if let Some(year) = year {
        let result = provider.discover_by_year(media_type, year);
        record(
            SourceOutcome {
                source: CandidateSource::Discover { year },
                result,
            },
            &mut outcomes,
        );
    }

    for page in 1..=SEARCH_PAGES {
        let result = provider.search(media_type, query, page);
        let exhausted = matches!(&result, Ok(items) if items.is_empty());
        record(
            SourceOutcome {
                source: CandidateSource::Search { page },
                result,
            },
            &mut outcomes,
        );
        if exhausted {
            break;
        }
    }

    for (listing, pages) in Listing::SWEEP {
        for page in 1..=pages {
            let result = provider.listing(media_type, listing, page);
            record(
                SourceOutcome {
                    source: CandidateSource::Listing { listing, page },
                    result,
                },
                &mut outcomes,
            );
        }
    }

    outcomes
}

/// Flattens source outcomes into one candidate list, skipping failed sources
pub fn pool_candidates(outcomes: Vec<SourceOutcome>) -> Vec<CatalogItem> {
    outcomes
        .into_iter()
        .filter_map(|outcome| outcome.result.ok())
        .flatten()
        .collect()
}

/// Removes duplicate identifiers, keeping the first occurrence
///
/// Order is preserved, so applying this twice gives the same list as once.
pub fn merge_unique<I>(items: I) -> Vec<CatalogItem>
where
    I: IntoIterator<Item = CatalogItem>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id))
        .collect()
}

/// Truncates a synopsis for display
///
/// `max_chars` counts characters; 0 disables truncation. Cut text gets a
/// trailing `...`.
pub fn display_synopsis(synopsis: Option<&str>, max_chars: usize) -> String {
    let Some(synopsis) = synopsis.filter(|s| !s.is_empty()) else {
        return NO_SYNOPSIS.to_string();
    };

    if max_chars == 0 {
        return synopsis.to_string();
    }

    match synopsis.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &synopsis[..cut]),
        None => synopsis.to_string(),
    }
}

/// Matches candidates against the query and prepares them for display
///
/// With a year filter, candidates whose release year differs or cannot be
/// determined are dropped before matching. Candidates that do not match are
/// dropped; description-only matches get their synopsis highlighted.
pub fn rank_candidates(
    candidates: Vec<CatalogItem>,
    query: &Query,
    year: Option<i32>,
    synopsis_length: usize,
) -> Vec<SearchResult> {
    candidates
        .into_iter()
        .filter(|item| year.is_none() || item.release_year() == year)
        .filter_map(|item| {
            let kind = query.classify(item.title.as_deref(), item.synopsis.as_deref());
            if !kind.is_match() {
                return None;
            }

            let mut synopsis = display_synopsis(item.synopsis.as_deref(), synopsis_length);
            if kind == MatchKind::DescriptionOnly {
                synopsis = highlight(&synopsis, query);
            }

            Some(SearchResult {
                item,
                kind,
                synopsis,
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::metadata_retrieval::GenreTable;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    pub(crate) fn movie(id: u64, title: &str, synopsis: &str, date: &str) -> CatalogItem {
        CatalogItem {
            id,
            media_type: MediaType::Movie,
            title: Some(title.to_string()),
            release_date: Some(date.to_string()).filter(|d| !d.is_empty()),
            synopsis: Some(synopsis.to_string()).filter(|s| !s.is_empty()),
            genre_ids: Vec::new(),
        }
    }

    /// In-memory catalog keyed by request, recording every request made
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        pub search: HashMap<u32, Vec<CatalogItem>>,
        pub listings: HashMap<(Listing, u32), Vec<CatalogItem>>,
        pub discover: Vec<CatalogItem>,
        pub failing: Vec<CandidateSource>,
        pub requests: RefCell<Vec<CandidateSource>>,
    }

    impl FakeCatalog {
        fn answer(
            &self,
            source: CandidateSource,
            items: Option<&Vec<CatalogItem>>,
        ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
            self.requests.borrow_mut().push(source);
            if self.failing.contains(&source) {
                return Err(MetadataRetrievalError::HttpStatus {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                });
            }
            Ok(items.cloned().unwrap_or_default())
        }
    }

    impl CatalogProvider for FakeCatalog {
        fn search(
            &self,
            _media_type: MediaType,
            _query: &str,
            page: u32,
        ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
            self.answer(CandidateSource::Search { page }, self.search.get(&page))
        }

        fn listing(
            &self,
            _media_type: MediaType,
            listing: Listing,
            page: u32,
        ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
            self.answer(
                CandidateSource::Listing { listing, page },
                self.listings.get(&(listing, page)),
            )
        }

        fn discover_by_year(
            &self,
            _media_type: MediaType,
            year: i32,
        ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
            self.answer(CandidateSource::Discover { year }, Some(&self.discover))
        }

        fn genres(&self, _media_type: MediaType) -> Result<GenreTable, MetadataRetrievalError> {
            Ok([(28, "Action".to_string())].into_iter().collect())
        }
    }

    #[test]
    fn test_source_order_without_year() {
        let mut catalog = FakeCatalog::default();
        catalog.search.insert(1, vec![movie(1, "Dragon", "", "")]);
        catalog.search.insert(2, vec![movie(2, "Dragon II", "", "")]);

        let outcomes = collect_sources(&catalog, MediaType::Movie, "dragon", None, |_| {});
        let sources: Vec<CandidateSource> = outcomes.iter().map(|o| o.source).collect();

        // Search page 3 is empty, so pages 4 and 5 are never requested.
        assert_eq!(sources[0], CandidateSource::Search { page: 1 });
        assert_eq!(sources[2], CandidateSource::Search { page: 3 });
        assert_eq!(
            sources[3],
            CandidateSource::Listing {
                listing: Listing::Popular,
                page: 1
            }
        );
        assert_eq!(sources.len(), 3 + 10);
        assert_eq!(*catalog.requests.borrow(), sources);
    }

    #[test]
    fn test_discover_comes_first_with_year() {
        let catalog = FakeCatalog::default();
        let outcomes = collect_sources(&catalog, MediaType::Movie, "dragon", Some(2010), |_| {});
        assert_eq!(outcomes[0].source, CandidateSource::Discover { year: 2010 });
        assert_eq!(outcomes[1].source, CandidateSource::Search { page: 1 });
    }

    #[test]
    fn test_failed_source_contributes_nothing() {
        let mut catalog = FakeCatalog::default();
        catalog.search.insert(1, vec![movie(1, "Dragon", "", "")]);
        catalog.listings.insert(
            (Listing::Popular, 1),
            vec![movie(2, "Lost", "A dragon story", "")],
        );
        catalog.listings.insert(
            (Listing::TopRated, 1),
            vec![movie(3, "Found", "Another dragon story", "")],
        );
        catalog.failing.push(CandidateSource::Listing {
            listing: Listing::Popular,
            page: 1,
        });

        let mut failures = Vec::new();
        let outcomes = collect_sources(&catalog, MediaType::Movie, "dragon", None, |event| {
            if let ProgressEvent::SourceFailed { source, .. } = event {
                failures.push(source);
            }
        });

        assert_eq!(
            failures,
            vec![CandidateSource::Listing {
                listing: Listing::Popular,
                page: 1
            }]
        );
        let ids: Vec<u64> = pool_candidates(outcomes).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_merge_unique_keeps_first() {
        let merged = merge_unique(vec![
            movie(1, "First", "", ""),
            movie(2, "Second", "", ""),
            movie(1, "First again", "", ""),
        ]);
        let titles: Vec<&str> = merged.iter().filter_map(|i| i.title.as_deref()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_display_synopsis() {
        assert_eq!(display_synopsis(None, 10), NO_SYNOPSIS);
        assert_eq!(display_synopsis(Some(""), 10), NO_SYNOPSIS);
        assert_eq!(display_synopsis(Some("short"), 10), "short");
        assert_eq!(display_synopsis(Some("exactly10!"), 10), "exactly10!");
        assert_eq!(display_synopsis(Some("a longer synopsis"), 8), "a longer...");
        assert_eq!(display_synopsis(Some("a longer synopsis"), 0), "a longer synopsis");
        assert_eq!(display_synopsis(Some("héllo wörld"), 5), "héllo...");
    }

    #[test]
    fn test_rank_drops_non_matches_and_highlights_descriptions() {
        let query = Query::new("dragon");
        let results = rank_candidates(
            vec![
                movie(1, "Dragon Heart", "A knight and a dragon.", "1996-05-31"),
                movie(2, "The Hobbit", "A dragon guards gold.", "2012-12-12"),
                movie(3, "Heat", "A heist in Los Angeles.", "1995-12-15"),
            ],
            &query,
            None,
            1000,
        );

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, MatchKind::TitleMatch);
        assert_eq!(results[0].synopsis, "A knight and a dragon.");
        assert_eq!(results[1].kind, MatchKind::DescriptionOnly);
        assert_eq!(
            results[1].synopsis,
            format!(
                "A {}dragon{} guards gold.",
                crate::highlight::EMPHASIS_START,
                crate::highlight::EMPHASIS_END
            )
        );
    }

    #[test]
    fn test_rank_with_year_filter() {
        let query = Query::new("dragon");
        let results = rank_candidates(
            vec![
                movie(1, "Dragon Heart", "", "1996-05-31"),
                movie(2, "Dragon Slayer", "", "1981-06-26"),
                movie(3, "Dragon Undated", "", ""),
                movie(4, "Dragon Garbled", "", "soon"),
            ],
            &query,
            Some(1996),
            1000,
        );

        let ids: Vec<u64> = results.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_title_matches_rank_ahead_of_sweep_results() {
        let mut catalog = FakeCatalog::default();
        catalog.search.insert(
            1,
            vec![
                movie(1, "Dragon Heart", "", ""),
                movie(2, "Dragonslayer", "", ""),
            ],
        );
        catalog.listings.insert(
            (Listing::Popular, 1),
            vec![
                movie(3, "The Hobbit", "A dragon guards gold.", ""),
                movie(4, "Shrek", "An ogre meets a dragon.", ""),
                movie(5, "Mulan", "A small dragon helps.", ""),
            ],
        );

        let outcomes = collect_sources(&catalog, MediaType::Movie, "dragon", None, |_| {});
        let candidates = merge_unique(pool_candidates(outcomes));
        let results = rank_candidates(candidates, &Query::new("dragon"), None, 1000);

        let kinds: Vec<MatchKind> = results.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MatchKind::TitleMatch,
                MatchKind::TitleMatch,
                MatchKind::DescriptionOnly,
                MatchKind::DescriptionOnly,
                MatchKind::DescriptionOnly,
            ]
        );
    }

    proptest! {
        #[test]
        fn merge_unique_is_idempotent(ids in proptest::collection::vec(0u64..20, 0..40)) {
            let items: Vec<CatalogItem> = ids
                .iter()
                .enumerate()
                .map(|(i, &id)| movie(id, &format!("Title {}", i), "", ""))
                .collect();

            let once = merge_unique(items);
            let twice = merge_unique(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
