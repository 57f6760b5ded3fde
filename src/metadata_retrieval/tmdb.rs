/// TMDB catalog provider implementation.
use super::tmdb_types::{TmdbGenreList, TmdbItem, TmdbPage};
use super::{CatalogItem, CatalogProvider, GenreTable, Listing, MediaType, MetadataRetrievalError};
use serde::de::DeserializeOwned;

/// Catalog provider for the TMDB v3 API.
///
/// This provider fetches movie and TV show information from
/// https://api.themoviedb.org using an API key passed as query parameter.
pub struct TmdbProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbProvider {
    /// Creates a new TMDB provider instance.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: api_key.into(),
            language: "en".to_string(),
        }
    }

    /// Points the provider at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Path segment distinguishing movie and TV endpoints.
    fn media_segment(media_type: MediaType) -> &'static str {
        match media_type {
            MediaType::Movie => "movie",
            MediaType::Series => "tv",
        }
    }

    /// Path segment of a curated listing for the given media type.
    fn listing_segment(media_type: MediaType, listing: Listing) -> &'static str {
        match (media_type, listing) {
            (_, Listing::Popular) => "popular",
            (_, Listing::TopRated) => "top_rated",
            (MediaType::Movie, Listing::NowPlaying) => "now_playing",
            (MediaType::Series, Listing::NowPlaying) => "on_the_air",
            (MediaType::Movie, Listing::Upcoming) => "upcoming",
            (MediaType::Series, Listing::Upcoming) => "airing_today",
        }
    }

    /// Converts a TMDB entry to our internal CatalogItem structure.
    ///
    /// TMDB sends empty strings for unknown dates and overviews; those become None.
    fn convert_item(media_type: MediaType, item: TmdbItem) -> CatalogItem {
        let (title, release_date) = match media_type {
            MediaType::Movie => (item.title, item.release_date),
            MediaType::Series => (item.name, item.first_air_date),
        };

        CatalogItem {
            id: item.id,
            media_type,
            title,
            release_date: release_date.filter(|d| !d.trim().is_empty()),
            synopsis: item.overview.filter(|o| !o.trim().is_empty()),
            genre_ids: item.genre_ids,
        }
    }

    /// Decodes every entry of a page, silently skipping malformed ones.
    fn items_from_page(media_type: MediaType, page: TmdbPage) -> Vec<CatalogItem> {
        page.results
            .into_iter()
            .filter_map(|value| serde_json::from_value::<TmdbItem>(value).ok())
            .map(|item| Self::convert_item(media_type, item))
            .collect()
    }

    /// Performs a GET request against the API and decodes the JSON body.
    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MetadataRetrievalError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MetadataRetrievalError::HttpStatus {
                status: response.status().as_u16(),
                reason: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        response
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))
    }

    /// Fetches a result page and converts its entries.
    fn fetch_items(
        &self,
        media_type: MediaType,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
        let page: TmdbPage = self.get(path, params)?;
        Ok(Self::items_from_page(media_type, page))
    }
}

impl CatalogProvider for TmdbProvider {
    fn search(
        &self,
        media_type: MediaType,
        query: &str,
        page: u32,
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
        let path = format!("/search/{}", Self::media_segment(media_type));
        self.fetch_items(
            media_type,
            &path,
            &[("query", query.to_string()), ("page", page.to_string())],
        )
    }

    fn listing(
        &self,
        media_type: MediaType,
        listing: Listing,
        page: u32,
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
        let path = format!(
            "/{}/{}",
            Self::media_segment(media_type),
            Self::listing_segment(media_type, listing)
        );
        self.fetch_items(media_type, &path, &[("page", page.to_string())])
    }

    fn discover_by_year(
        &self,
        media_type: MediaType,
        year: i32,
    ) -> Result<Vec<CatalogItem>, MetadataRetrievalError> {
        let year_param = match media_type {
            MediaType::Movie => "primary_release_year",
            MediaType::Series => "first_air_date_year",
        };
        let path = format!("/discover/{}", Self::media_segment(media_type));
        self.fetch_items(media_type, &path, &[(year_param, year.to_string())])
    }

    fn genres(&self, media_type: MediaType) -> Result<GenreTable, MetadataRetrievalError> {
        let path = format!("/genre/{}/list", Self::media_segment(media_type));
        let list: TmdbGenreList = self.get(&path, &[])?;

        Ok(list
            .genres
            .into_iter()
            .map(|genre| (genre.id, genre.name))
            .collect())
    }
}
