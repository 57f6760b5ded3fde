/// TMDB API response types for deserialization.
///
/// These structures mirror the JSON response format of the TMDB v3 API.
use serde::Deserialize;

/// One page of a search, listing or discover response.
///
/// Results are kept as raw values so that a single malformed entry can be
/// skipped without discarding the whole page.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbPage {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// A movie or TV show entry from a result page.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbItem {
    pub id: u64,
    /// Movie title (absent for TV shows)
    pub title: Option<String>,
    /// TV show name (absent for movies)
    pub name: Option<String>,
    pub overview: Option<String>,
    /// Movie release date, `YYYY-MM-DD` or empty
    pub release_date: Option<String>,
    /// TV show first air date, `YYYY-MM-DD` or empty
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// Response of the genre list endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbGenreList {
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbGenre {
    pub id: u32,
    pub name: String,
}
