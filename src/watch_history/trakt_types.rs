/// Trakt API response types for deserialization.
///
/// These structures mirror the JSON response format of the Trakt
/// `/sync/history` endpoint. Only the fields needed for title lookup are kept.
use serde::Deserialize;

/// A single history entry, tagged by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(super) enum TraktHistoryEntry {
    /// A watched movie
    Movie { movie: TraktTitled },
    /// A watched episode, carrying its parent show
    Episode { show: TraktTitled },
    /// Any other entry type
    #[serde(other)]
    Other,
}

/// A movie or show reference; only the title is of interest.
#[derive(Debug, Deserialize)]
pub(super) struct TraktTitled {
    pub title: Option<String>,
}
