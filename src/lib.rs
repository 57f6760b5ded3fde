//! watch-search - Find movies and series by title or synopsis
//!
//! This library provides the core functionality for searching a movie and TV
//! catalog by free text, matching the query against titles and synopses,
//! and hiding titles that already appear in the user's watch history.

mod aggregator;
mod config;
mod diagnostics;
mod display;
mod highlight;
mod history_filter;
mod metadata_retrieval;
mod relevance;
mod watch_history;

#[cfg(test)]
mod test_server;

// Re-export error types
pub use config::ConfigError;
pub use metadata_retrieval::MetadataRetrievalError;
pub use watch_history::HistoryRetrievalError;

// Re-export matching and rendering
pub use highlight::{
    EMPHASIS_END, EMPHASIS_START, find_span, highlight, match_context, strip_emphasis,
};
pub use relevance::{MatchKind, Query, overlap_threshold};

// Re-export providers and their data types
pub use metadata_retrieval::{
    CatalogItem, CatalogProvider, GenreTable, Listing, MediaType, TmdbProvider,
};
pub use watch_history::{
    HISTORY_PAGE_SIZE, HistoryProvider, TraktProvider, WatchedItem, WatchedTitleSet,
    fetch_watched_titles,
};

// Re-export configuration and pipeline stages
pub use aggregator::{
    CandidateSource, NO_SYNOPSIS, SEARCH_PAGES, SearchResult, SourceOutcome, collect_sources,
    display_synopsis, merge_unique, pool_candidates, rank_candidates,
};
pub use config::{
    DEFAULT_LIMIT, DEFAULT_SYNOPSIS_LENGTH, Environment, HistoryConfig, MediaSelection,
    SearchConfig, SearchOptions, TMDB_API_KEY, TRAKT_ACCESS_TOKEN, TRAKT_CLIENT_ID,
    TmdbCredentials, TraktCredentials,
};
pub use diagnostics::init_tracing;
pub use display::{
    closing_lines, colors, filtered_note, format_result, no_results, rerun_hint, section_header,
    unwatched_note,
};
pub use history_filter::{FilteredResults, select_for_display};

use thiserror::Error;

/// Progress event emitted during a search
///
/// These events allow library users to track progress and provide feedback
/// while candidates are fetched and filtered.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Fetching candidates for a media type
    FetchingCandidates { media_type: MediaType, query: String },

    /// A candidate source answered
    SourceFetched {
        media_type: MediaType,
        source: CandidateSource,
        count: usize,
    },

    /// A candidate source failed and contributes nothing
    SourceFailed {
        media_type: MediaType,
        source: CandidateSource,
        error: String,
    },

    /// Candidates pooled and de-duplicated
    CandidatesMerged { media_type: MediaType, count: usize },

    /// Candidates matched against the query
    CandidatesRanked {
        media_type: MediaType,
        matches: usize,
    },

    /// A candidate matched through its synopsis only
    DescriptionMatched {
        media_type: MediaType,
        title: String,
        /// Overlapping query words and the total number of query words
        overlap: usize,
        words: usize,
        /// Text around the whole query, when it occurs verbatim
        context: Option<String>,
    },

    /// A result was hidden because it was already watched
    WatchedTitleFiltered { media_type: MediaType, title: String },

    /// The genre table could not be loaded
    GenresUnavailable { media_type: MediaType, error: String },

    /// One page of watch history processed
    HistoryPageProcessed { page: u32, entries: usize },
}

/// Characters of synopsis context reported on each side of a verbatim match
const MATCH_CONTEXT_RADIUS: usize = 30;

/// Top-level error type for watch-search operations
#[derive(Debug, Error)]
pub enum WatchSearchError {
    /// Error while assembling the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error during watch history retrieval
    #[error("History retrieval error: {0}")]
    HistoryRetrieval(#[from] HistoryRetrievalError),
}

/// Search results of one media type
#[derive(Debug, Clone, PartialEq)]
pub struct MediaResults {
    pub media_type: MediaType,
    /// Unique candidates examined before matching
    pub candidate_count: usize,
    /// Displayed results plus the titles the watched filter removed
    pub results: FilteredResults,
}

impl MediaResults {
    /// Returns true if nothing is displayed for this media type
    pub fn is_empty(&self) -> bool {
        self.results.shown.is_empty()
    }
}

/// Searches one media type of the catalog
///
/// Candidates are collected from the provider's direct search and its
/// curated listings, de-duplicated, matched against the query and limited
/// for display. When a watched set is given, titles found in it are hidden.
///
/// Failing provider requests never abort the search; they are reported
/// through the callback and contribute no candidates.
///
/// # Examples
///
/// ```no_run
/// use watch_search::{search_catalog, MediaType, ProgressEvent, SearchOptions, TmdbProvider};
///
/// let provider = TmdbProvider::new("api-key");
/// let options = SearchOptions {
///     query: "dragon".to_string(),
///     ..SearchOptions::default()
/// };
///
/// let movies = search_catalog(&provider, &options, MediaType::Movie, None, |event| {
///     if let ProgressEvent::SourceFailed { source, error, .. } = event {
///         eprintln!("{} failed: {}", source, error);
///     }
/// });
///
/// for result in &movies.results.shown {
///     println!("{}", result.title());
/// }
/// ```
pub fn search_catalog<P, F>(
    provider: &P,
    options: &SearchOptions,
    media_type: MediaType,
    watched: Option<&WatchedTitleSet>,
    mut progress_callback: F,
) -> MediaResults
where
    P: CatalogProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::FetchingCandidates {
        media_type,
        query: options.query.clone(),
    });

    let outcomes = collect_sources(
        provider,
        media_type,
        &options.query,
        options.year,
        &mut progress_callback,
    );
    let candidates = merge_unique(pool_candidates(outcomes));
    let candidate_count = candidates.len();

    progress_callback(ProgressEvent::CandidatesMerged {
        media_type,
        count: candidate_count,
    });

    let query = Query::new(&options.query);
    let ranked = rank_candidates(candidates, &query, options.year, options.synopsis_length);

    progress_callback(ProgressEvent::CandidatesRanked {
        media_type,
        matches: ranked.len(),
    });

    for result in ranked.iter().filter(|r| r.kind == MatchKind::DescriptionOnly) {
        let synopsis = result.item.synopsis.as_deref().unwrap_or_default();
        progress_callback(ProgressEvent::DescriptionMatched {
            media_type,
            title: result.title().to_string(),
            overlap: query.overlap_count(synopsis),
            words: query.tokens().len(),
            context: match_context(synopsis, &query, MATCH_CONTEXT_RADIUS).map(str::to_string),
        });
    }

    let results = select_for_display(ranked, watched, options.limit);
    for title in &results.filtered_titles {
        progress_callback(ProgressEvent::WatchedTitleFiltered {
            media_type,
            title: title.clone(),
        });
    }

    MediaResults {
        media_type,
        candidate_count,
        results,
    }
}

/// Loads the genre table for a media type
///
/// Results are still worth showing without genre names, so a failure is
/// reported through the callback and yields an empty table.
pub fn load_genres<P, F>(
    provider: &P,
    media_type: MediaType,
    mut progress_callback: F,
) -> GenreTable
where
    P: CatalogProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    provider.genres(media_type).unwrap_or_else(|error| {
        progress_callback(ProgressEvent::GenresUnavailable {
            media_type,
            error: error.to_string(),
        });
        GenreTable::default()
    })
}
