/// Trakt history provider implementation.
use super::trakt_types::TraktHistoryEntry;
use super::{HistoryProvider, HistoryRetrievalError, WatchedItem};
use crate::config::TraktCredentials;

/// History provider for the Trakt API.
///
/// This provider reads the authenticated user's watch history from
/// https://api.trakt.tv using an OAuth bearer token and the client id.
pub struct TraktProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
    client_id: String,
}

impl TraktProvider {
    /// Creates a new Trakt provider instance.
    pub fn new(credentials: &TraktCredentials) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: "https://api.trakt.tv".to_string(),
            access_token: credentials.access_token.clone(),
            client_id: credentials.client_id.clone(),
        }
    }

    /// Points the provider at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Converts a Trakt entry to our internal WatchedItem structure.
    fn convert_entry(entry: TraktHistoryEntry) -> WatchedItem {
        match entry {
            TraktHistoryEntry::Movie { movie } => WatchedItem::Movie { title: movie.title },
            TraktHistoryEntry::Episode { show } => WatchedItem::Episode {
                show_title: show.title,
            },
            TraktHistoryEntry::Other => WatchedItem::Other,
        }
    }
}

impl HistoryProvider for TraktProvider {
    fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<WatchedItem>, HistoryRetrievalError> {
        let url = format!("{}/sync/history", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("limit", limit)])
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("trakt-api-version", "2")
            .header("trakt-api-key", &self.client_id)
            .send()
            .map_err(|e| HistoryRetrievalError::RequestError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(HistoryRetrievalError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let entries: Vec<TraktHistoryEntry> = response
            .json()
            .map_err(|e| HistoryRetrievalError::ParseError(e.to_string()))?;

        Ok(entries.into_iter().map(Self::convert_entry).collect())
    }
}
