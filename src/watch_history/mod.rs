//! Watch history retrieval module
//!
//! This module rebuilds the set of titles the user has already watched from
//! a remote history provider, and answers lookups against that set.

mod trakt;
mod trakt_types;

pub use trakt::TraktProvider;

use crate::ProgressEvent;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Number of history entries requested per page
pub const HISTORY_PAGE_SIZE: u32 = 100;

/// Errors that can occur while retrieving the watch history
#[derive(Debug, Error)]
pub enum HistoryRetrievalError {
    /// Request to the history provider failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The provider answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// A single entry of the watch history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchedItem {
    /// A watched movie
    Movie { title: Option<String> },
    /// A watched episode; only the parent show's title is kept
    Episode { show_title: Option<String> },
    /// Anything else the provider reports
    Other,
}

impl WatchedItem {
    /// The title this entry contributes to the watched set, if any
    pub fn into_title(self) -> Option<String> {
        match self {
            WatchedItem::Movie { title } => title,
            WatchedItem::Episode { show_title } => show_title,
            WatchedItem::Other => None,
        }
    }
}

/// Trait for providers that serve the watch history page by page.
pub trait HistoryProvider {
    /// Fetches one page of history entries.
    ///
    /// # Arguments
    ///
    /// * `page` - One-based page number
    /// * `limit` - Maximum number of entries on the page
    ///
    /// # Returns
    ///
    /// The entries of the page; an empty page marks the end of the history.
    fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<WatchedItem>, HistoryRetrievalError>;
}

/// The set of titles found in the watch history
///
/// Titles keep their original casing. Lookups fold case at query time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchedTitleSet {
    titles: BTreeSet<String>,
    folded: HashSet<String>,
}

impl WatchedTitleSet {
    /// Adds a title; duplicates are ignored
    pub fn insert(&mut self, title: String) {
        self.folded.insert(title.to_lowercase());
        self.titles.insert(title);
    }

    /// Number of distinct titles
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Returns true if no titles were recorded
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Checks for a title equal to the given one, ignoring case
    ///
    /// This is exact matching: "The Matrix" does not cover "The Matrix Reloaded".
    pub fn contains_title(&self, title: &str) -> bool {
        self.folded.contains(&title.to_lowercase())
    }

    /// Returns every title containing the query, ignoring case, sorted
    pub fn check_title(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.titles
            .iter()
            .filter(|title| title.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    /// Returns all titles in sorted order
    pub fn sorted_titles(&self) -> Vec<&str> {
        self.titles.iter().map(String::as_str).collect()
    }
}

impl FromIterator<String> for WatchedTitleSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = WatchedTitleSet::default();
        for title in iter {
            set.insert(title);
        }
        set
    }
}

/// Retrieves the complete set of watched titles
///
/// Pages are requested starting at page 1 until the provider returns an
/// empty page. Movies contribute their own title and episodes the title of
/// their show, so a show appears once no matter how many episodes were
/// watched.
///
/// # Errors
///
/// Returns the first error reported by the provider; no partial set is returned.
pub fn fetch_watched_titles<P, F>(
    provider: &P,
    mut progress_callback: F,
) -> Result<WatchedTitleSet, HistoryRetrievalError>
where
    P: HistoryProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    let mut titles = WatchedTitleSet::default();
    let mut page = 1;

    loop {
        let entries = provider.fetch_page(page, HISTORY_PAGE_SIZE)?;
        if entries.is_empty() {
            break;
        }

        let entry_count = entries.len();
        for entry in entries {
            if let Some(title) = entry.into_title() {
                titles.insert(title);
            }
        }

        progress_callback(ProgressEvent::HistoryPageProcessed {
            page,
            entries: entry_count,
        });

        page += 1;
    }

    Ok(titles)
}
