/// Data structures and traits for movie and TV catalog retrieval.
///
/// This module provides structures to represent catalog entries and genre
/// tables, as well as the trait implemented by catalog providers.
mod tmdb;
mod tmdb_types;

pub use tmdb::TmdbProvider;

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during catalog retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Request to the catalog provider failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The provider answered with a non-success status
    #[error("HTTP {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// The two kinds of titles a catalog provider knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    /// Both media types, movies first
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Series];

    /// Plural noun used in user-facing messages
    pub fn plural(self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Series => "TV shows",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "TV"),
        }
    }
}

/// Curated listings swept to widen the pool of synopsis candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    Popular,
    TopRated,
    /// Now playing (movies) or on the air (series)
    NowPlaying,
    /// Upcoming (movies) or airing today (series)
    Upcoming,
}

impl Listing {
    /// Each listing with the number of pages fetched from it
    pub const SWEEP: [(Listing, u32); 4] = [
        (Listing::Popular, 3),
        (Listing::TopRated, 3),
        (Listing::NowPlaying, 2),
        (Listing::Upcoming, 2),
    ];
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Listing::Popular => "popular",
            Listing::TopRated => "top rated",
            Listing::NowPlaying => "now playing",
            Listing::Upcoming => "upcoming",
        };
        write!(f, "{}", name)
    }
}

/// A single movie or series as returned by the catalog provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Provider identifier, unique per media type
    pub id: u64,
    /// Whether this is a movie or a series
    pub media_type: MediaType,
    /// Display title, if the provider sent one
    pub title: Option<String>,
    /// Release or first-air date, usually `YYYY-MM-DD`
    pub release_date: Option<String>,
    /// Plot synopsis
    pub synopsis: Option<String>,
    /// Genre identifiers, resolved through a [`GenreTable`]
    pub genre_ids: Vec<u32>,
}

impl CatalogItem {
    /// Parses the year out of the release date
    ///
    /// Returns None when the date is absent or does not start with a number.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()?
            .split('-')
            .next()?
            .trim()
            .parse()
            .ok()
    }
}

/// Genre identifier to display name lookup for one media type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreTable {
    names: HashMap<u32, String>,
}

impl GenreTable {
    /// Number of known genres
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no genres are known
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves genre identifiers to names, skipping unknown or unnamed ones
    pub fn names<'a>(&'a self, ids: &[u32]) -> Vec<&'a str> {
        ids.iter()
            .filter_map(|id| self.names.get(id))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

impl FromIterator<(u32, String)> for GenreTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Trait for catalog providers that can search and list movies and series.
///
/// Implementors answer each request with the items of a single result page.
/// Callers treat every request as independent, so one failing request does
/// not prevent the others from being made.
pub trait CatalogProvider {
    /// Searches titles for the query.
    ///
    /// # Arguments
    ///
    /// * `media_type` - Whether to search movies or series
    /// * `query` - Free-text query as typed by the user
    /// * `page` - One-based result page
    fn search(
        &self,
        media_type: MediaType,
        query: &str,
        page: u32,
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError>;

    /// Fetches one page of a curated listing.
    fn listing(
        &self,
        media_type: MediaType,
        listing: Listing,
        page: u32,
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError>;

    /// Discovers titles first released in the given year.
    fn discover_by_year(
        &self,
        media_type: MediaType,
        year: i32,
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError>;

    /// Fetches the genre table for a media type.
    fn genres(&self, media_type: MediaType) -> Result<GenreTable, MetadataRetrievalError>;
}
