//! Configuration module
//!
//! Credentials come from the process environment (optionally seeded from a
//! `.env` file). Each binary assembles its configuration once at start-up,
//! before any network call, and passes it around by reference.

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the TMDB API key
pub const TMDB_API_KEY: &str = "TMDB_API_KEY";
/// Environment variable holding the Trakt OAuth access token
pub const TRAKT_ACCESS_TOKEN: &str = "TRAKT_ACCESS_TOKEN";
/// Environment variable holding the Trakt client id
pub const TRAKT_CLIENT_ID: &str = "TRAKT_CLIENT_ID";

/// Default number of results shown per media type
pub const DEFAULT_LIMIT: usize = 20;
/// Default number of synopsis characters shown (0 shows everything)
pub const DEFAULT_SYNOPSIS_LENGTH: usize = 1000;

/// Errors that can occur while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty
    #[error("Missing environment variable(s): {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    /// The environment could not be read
    #[error("Failed to read environment: {0}")]
    Environment(#[from] envy::Error),

    /// The search query has no words
    #[error("Search query must contain at least one word")]
    EmptyQuery,
}

/// Raw credential values as found in the environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    tmdb_api_key: Option<String>,
    trakt_access_token: Option<String>,
    trakt_client_id: Option<String>,
}

impl Environment {
    /// Reads the process environment, loading `.env` first when present
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env::<Environment>()?)
    }

    /// Reads credentials from explicit key/value pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Environment>(pairs)?)
    }

    /// Looks up a variable by name; blank values count as unset
    fn lookup(&self, name: &str) -> Option<&str> {
        let value = match name {
            TMDB_API_KEY => self.tmdb_api_key.as_deref(),
            TRAKT_ACCESS_TOKEN => self.trakt_access_token.as_deref(),
            TRAKT_CLIENT_ID => self.trakt_client_id.as_deref(),
            _ => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Returns the values of all named variables, or every missing name
    fn require(&self, names: &[&'static str]) -> Result<Vec<String>, ConfigError> {
        let missing: Vec<&'static str> = names
            .iter()
            .copied()
            .filter(|name| self.lookup(name).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        Ok(names
            .iter()
            .filter_map(|name| self.lookup(name))
            .map(str::to_string)
            .collect())
    }
}

/// Credentials for the TMDB catalog API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbCredentials {
    pub api_key: String,
}

/// Credentials for the Trakt history API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraktCredentials {
    pub access_token: String,
    pub client_id: String,
}

/// Which media types a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaSelection {
    pub movies: bool,
    pub series: bool,
}

impl Default for MediaSelection {
    fn default() -> Self {
        Self {
            movies: true,
            series: true,
        }
    }
}

/// User-supplied search settings, before credentials are attached
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Free-text query; multiple command line words joined by a space
    pub query: String,
    pub media: MediaSelection,
    /// Only keep titles released (or first aired) in this year
    pub year: Option<i32>,
    /// Maximum number of displayed results per media type
    pub limit: usize,
    /// Hide titles found in the watch history
    pub not_watched: bool,
    /// Synopsis characters to show, 0 for the full text
    pub synopsis_length: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            media: MediaSelection::default(),
            year: None,
            limit: DEFAULT_LIMIT,
            not_watched: false,
            synopsis_length: DEFAULT_SYNOPSIS_LENGTH,
        }
    }
}

/// Complete configuration of a catalog search run
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub options: SearchOptions,
    pub tmdb: TmdbCredentials,
    /// Present exactly when unwatched-only filtering was requested
    pub trakt: Option<TraktCredentials>,
}

impl SearchConfig {
    /// Attaches credentials to the search options
    ///
    /// The TMDB key is always required; the Trakt credentials only when
    /// unwatched-only filtering is requested. All missing variables are
    /// reported together.
    pub fn assemble(options: SearchOptions, env: &Environment) -> Result<Self, ConfigError> {
        if options.query.split_whitespace().next().is_none() {
            return Err(ConfigError::EmptyQuery);
        }

        let mut names = vec![TMDB_API_KEY];
        if options.not_watched {
            names.extend([TRAKT_ACCESS_TOKEN, TRAKT_CLIENT_ID]);
        }

        let mut values = env.require(&names)?.into_iter();
        let tmdb = TmdbCredentials {
            api_key: values.next().unwrap_or_default(),
        };
        let trakt = match (values.next(), values.next()) {
            (Some(access_token), Some(client_id)) => Some(TraktCredentials {
                access_token,
                client_id,
            }),
            _ => None,
        };

        Ok(Self {
            options,
            tmdb,
            trakt,
        })
    }
}

/// Complete configuration of a watch history run
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    pub trakt: TraktCredentials,
    /// Title to check; None lists the whole history
    pub query: Option<String>,
}

impl HistoryConfig {
    /// Requires both Trakt credentials
    pub fn assemble(query: Option<String>, env: &Environment) -> Result<Self, ConfigError> {
        let mut values = env
            .require(&[TRAKT_ACCESS_TOKEN, TRAKT_CLIENT_ID])?
            .into_iter();

        Ok(Self {
            trakt: TraktCredentials {
                access_token: values.next().unwrap_or_default(),
                client_id: values.next().unwrap_or_default(),
            },
            query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        Environment::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    fn options(query: &str, not_watched: bool) -> SearchOptions {
        SearchOptions {
            query: query.to_string(),
            not_watched,
            ..SearchOptions::default()
        }
    }

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, 20);
        assert_eq!(options.synopsis_length, 1000);
        assert!(options.media.movies && options.media.series);
    }

    #[test]
    fn test_search_requires_tmdb_key() {
        let result = SearchConfig::assemble(options("dragon", false), &env(&[]));
        match result {
            Err(ConfigError::MissingVariables(names)) => assert_eq!(names, vec![TMDB_API_KEY]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_search_reports_every_missing_variable() {
        let result = SearchConfig::assemble(options("dragon", true), &env(&[]));
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable(s): TMDB_API_KEY, TRAKT_ACCESS_TOKEN, TRAKT_CLIENT_ID"
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let result = SearchConfig::assemble(
            options("dragon", false),
            &env(&[("TMDB_API_KEY", "   ")]),
        );
        assert!(matches!(result, Err(ConfigError::MissingVariables(_))));
    }

    #[test]
    fn test_search_without_history() {
        let config = SearchConfig::assemble(
            options("dragon", false),
            &env(&[("TMDB_API_KEY", "key"), ("TRAKT_CLIENT_ID", "ignored")]),
        )
        .unwrap();

        assert_eq!(config.tmdb.api_key, "key");
        assert_eq!(config.trakt, None);
    }

    #[test]
    fn test_search_with_history() {
        let config = SearchConfig::assemble(
            options("dragon", true),
            &env(&[
                ("TMDB_API_KEY", "key"),
                ("TRAKT_ACCESS_TOKEN", "token"),
                ("TRAKT_CLIENT_ID", "client"),
            ]),
        )
        .unwrap();

        assert_eq!(
            config.trakt,
            Some(TraktCredentials {
                access_token: "token".to_string(),
                client_id: "client".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_query_rejected() {
        let result =
            SearchConfig::assemble(options("   ", false), &env(&[("TMDB_API_KEY", "key")]));
        assert!(matches!(result, Err(ConfigError::EmptyQuery)));
    }

    #[test]
    fn test_history_requires_both_trakt_variables() {
        let result = HistoryConfig::assemble(None, &env(&[("TRAKT_ACCESS_TOKEN", "token")]));
        match result {
            Err(ConfigError::MissingVariables(names)) => {
                assert_eq!(names, vec![TRAKT_CLIENT_ID])
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let config = HistoryConfig::assemble(
            Some("matrix".to_string()),
            &env(&[("TRAKT_ACCESS_TOKEN", "token"), ("TRAKT_CLIENT_ID", "client")]),
        )
        .unwrap();
        assert_eq!(config.trakt.client_id, "client");
        assert_eq!(config.query.as_deref(), Some("matrix"));
    }
}
