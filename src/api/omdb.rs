//! OMDB (Open Movie Database) API client
//!
//! One GET per lookup, keyed by IMDB id (`i=`) or title (`t=`).
//! OMDB reports logical failures in the payload (`"Response": "False"`),
//! often with a 200 status, so the body is always decoded and the
//! `Response` field decides.
//! API docs: https://www.omdbapi.com/

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{LookupError, OmdbMovie, NOT_AVAILABLE};

/// Default OMDB endpoint
pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDB API error types
#[derive(Error, Debug)]
pub enum OmdbError {
    /// `Response` was not `"True"`; carries OMDB's `Error` text
    #[error("{0}")]
    Upstream(String),

    #[error("JSON parse error: {0}")]
    InvalidResponse(String),

    /// Transport failure, cause chain included and URL stripped
    #[error("{0}")]
    RequestFailed(String),
}

impl From<reqwest::Error> for OmdbError {
    fn from(e: reqwest::Error) -> Self {
        OmdbError::RequestFailed(super::describe_transport_error(e))
    }
}

impl From<OmdbError> for LookupError {
    fn from(e: OmdbError) -> Self {
        match e {
            OmdbError::Upstream(msg) => LookupError::Upstream(msg),
            other => LookupError::RequestFailed(other.to_string()),
        }
    }
}

/// OMDB API client
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    /// Create a client against a custom base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_http(
            api_key,
            base_url,
            super::http_client(super::DEFAULT_TIMEOUT),
        )
    }

    pub(crate) fn with_http(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client,
        }
    }

    /// Exact lookup by IMDB id (e.g. `tt1375666`)
    pub async fn by_id(&self, imdb_id: &str) -> Result<OmdbMovie, OmdbError> {
        self.fetch("i", imdb_id).await
    }

    /// Lookup by title; OMDB picks the best match
    pub async fn by_title(&self, title: &str) -> Result<OmdbMovie, OmdbError> {
        self.fetch("t", title).await
    }

    async fn fetch(&self, param: &str, value: &str) -> Result<OmdbMovie, OmdbError> {
        let url = format!(
            "{}?apikey={}&{}={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            param,
            urlencoding::encode(value)
        );
        debug!(param, value, "omdb request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: OmdbResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(%status, "omdb returned a non-JSON body");
            OmdbError::InvalidResponse(e.to_string())
        })?;

        parsed.into_movie()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: Option<String>,
    error: Option<String>,
    title: Option<String>,
    year: Option<String>,
    box_office: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    plot: Option<String>,
    poster: Option<String>,
}

impl OmdbResponse {
    fn into_movie(self) -> Result<OmdbMovie, OmdbError> {
        if self.response.as_deref() != Some("True") {
            let msg = self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Unknown OMDB error".to_string());
            return Err(OmdbError::Upstream(msg));
        }

        Ok(OmdbMovie {
            title: or_not_available(self.title),
            year: or_not_available(self.year),
            box_office: or_not_available(self.box_office),
            imdb_rating: or_not_available(self.imdb_rating),
            imdb_id: or_not_available(self.imdb_id),
            plot: or_not_available(self.plot),
            poster: or_not_available(self.poster),
        })
    }
}

fn or_not_available(field: Option<String>) -> String {
    field
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<OmdbMovie, OmdbError> {
        serde_json::from_str::<OmdbResponse>(json)
            .unwrap()
            .into_movie()
    }

    #[test]
    fn test_success_maps_fields() {
        let movie = parse(
            r#"{
                "Response": "True",
                "Title": "Inception",
                "Year": "2010",
                "BoxOffice": "$292,576,195",
                "imdbRating": "8.8",
                "imdbID": "tt1375666",
                "Plot": "Dreams within dreams",
                "Poster": "https://m.media-amazon.com/images/inception.jpg",
                "Runtime": "148 min"
            }"#,
        )
        .unwrap();

        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.year, "2010");
        assert_eq!(movie.box_office, "$292,576,195");
        assert_eq!(movie.imdb_rating, "8.8");
        assert_eq!(movie.imdb_id, "tt1375666");
        assert_eq!(movie.plot, "Dreams within dreams");
    }

    #[test]
    fn test_missing_box_office_is_not_available() {
        let movie = parse(r#"{"Response": "True", "Title": "Old Film", "Year": "1931"}"#).unwrap();
        assert_eq!(movie.box_office, "N/A");

        let movie = parse(r#"{"Response": "True", "Title": "Old Film", "BoxOffice": ""}"#).unwrap();
        assert_eq!(movie.box_office, "N/A");
    }

    #[test]
    fn test_false_response_is_upstream_error() {
        let err = parse(r#"{"Response": "False", "Error": "Movie not found!"}"#).unwrap_err();
        assert!(matches!(err, OmdbError::Upstream(ref m) if m == "Movie not found!"));
        assert_eq!(LookupError::from(err).to_string(), "Movie not found!");
    }

    #[test]
    fn test_missing_response_field_is_failure() {
        let err = parse(r#"{"Title": "Inception"}"#).unwrap_err();
        assert!(matches!(err, OmdbError::Upstream(_)));
    }

    #[test]
    fn test_invalid_response_wraps_as_request_failed() {
        let err = OmdbError::InvalidResponse("expected value".into());
        assert_eq!(
            LookupError::from(err).to_string(),
            "Request failed: JSON parse error: expected value"
        );
    }
}
