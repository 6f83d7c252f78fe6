//! TMDB (The Movie Database) API client
//!
//! Provides title search and movie details, normalized into `TmdbMovie`.
//! API docs: https://developer.themoviedb.org/docs

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{LookupError, TmdbMovie};

/// Default TMDB API endpoint
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Prefix for `poster_path` values
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    /// Non-success status; carries TMDB's `status_message` when present
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    InvalidResponse(String),

    /// Transport failure, cause chain included and URL stripped
    #[error("{0}")]
    RequestFailed(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(e: reqwest::Error) -> Self {
        TmdbError::RequestFailed(super::describe_transport_error(e))
    }
}

impl TmdbError {
    /// Failure reported at the search stage
    pub fn into_search_failure(self) -> LookupError {
        LookupError::SearchFailed(self.to_string())
    }
}

/// Failure reported at the details stage
impl From<TmdbError> for LookupError {
    fn from(e: TmdbError) -> Self {
        match e {
            TmdbError::Upstream { message, .. } => LookupError::Upstream(message),
            other => LookupError::RequestFailed(other.to_string()),
        }
    }
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a client against a custom base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_http(
            api_key,
            base_url,
            TMDB_IMAGE_BASE_URL,
            super::http_client(super::DEFAULT_TIMEOUT),
        )
    }

    pub(crate) fn with_http(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        image_base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.into(),
            client,
        }
    }

    /// Send a GET with the API key appended as a query parameter and return
    /// the status and raw body
    async fn send(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), TmdbError> {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in query {
            url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }
        debug!(endpoint, "tmdb request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// GET that treats a non-success status as an upstream error
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        let (status, body) = self.send(endpoint, query).await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| status.to_string());
            warn!(%status, endpoint, "tmdb returned an error status");
            return Err(TmdbError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| TmdbError::InvalidResponse(e.to_string()))
    }

    /// Search movies by title, returning candidate ids in TMDB's order.
    ///
    /// The body is decoded whatever the status: a JSON error payload has no
    /// `results` and comes back as an empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<u64>, TmdbError> {
        let (status, body) = self.send("/search/movie", &[("query", query)]).await?;
        if !status.is_success() {
            warn!(%status, "tmdb search returned an error status");
        }

        let response: SearchResponse =
            serde_json::from_str(&body).map_err(|e| TmdbError::InvalidResponse(e.to_string()))?;
        Ok(response.into_ids())
    }

    /// Get movie details by id
    pub async fn movie(&self, id: u64) -> Result<TmdbMovie, TmdbError> {
        let endpoint = format!("/movie/{}", id);
        let response: MovieResponse = self.get(&endpoint, &[]).await?;
        Ok(response.into_movie(id, &self.image_base_url))
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchHit>>,
}

impl SearchResponse {
    fn into_ids(self) -> Vec<u64> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .map(|hit| hit.id)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: Option<u64>,
    title: Option<String>,
    release_date: Option<String>,
    revenue: Option<u64>,
    budget: Option<u64>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
}

impl MovieResponse {
    fn into_movie(self, requested_id: u64, image_base_url: &str) -> TmdbMovie {
        TmdbMovie {
            title: self.title.unwrap_or_default(),
            year: self.release_date.as_deref().and_then(extract_year),
            revenue: format_usd(self.revenue.unwrap_or(0)),
            budget: format_usd(self.budget.unwrap_or(0)),
            tmdb_rating: self.vote_average.unwrap_or(0.0),
            tmdb_id: self.id.unwrap_or(requested_id),
            overview: self.overview.unwrap_or_default(),
            poster_url: self
                .poster_path
                .filter(|p| !p.is_empty())
                .map(|p| format!("{}{}", image_base_url, p)),
        }
    }
}

/// Year prefix of a date string like "2010-07-15"
fn extract_year(date: &str) -> Option<String> {
    if date.is_empty() {
        return None;
    }
    Some(date.chars().take(4).collect())
}

/// Format a dollar amount with en-US digit grouping: 292576195 -> "$292,576,195"
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
