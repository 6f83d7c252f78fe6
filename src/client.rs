//! Metadata lookup client
//!
//! Wraps the OMDB and TMDB clients behind one immutable configuration and
//! exposes the three lookups: OMDB by title or id, TMDB by id or title, and
//! a sequential batch over titles.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::omdb::{OmdbClient, OMDB_BASE_URL};
use crate::api::tmdb::{TmdbClient, TMDB_BASE_URL, TMDB_IMAGE_BASE_URL};
use crate::api::{http_client, DEFAULT_TIMEOUT};
use crate::models::{
    BatchEntry, LookupError, LookupResult, MovieRecord, OmdbMovie, Provider, TmdbMovie,
};

/// Immutable client configuration. Keys are optional; a missing key only
/// matters when that provider is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub omdb_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            omdb_api_key: None,
            tmdb_api_key: None,
            omdb_base_url: OMDB_BASE_URL.to_string(),
            tmdb_base_url: TMDB_BASE_URL.to_string(),
            tmdb_image_base_url: TMDB_IMAGE_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Configuration with the given keys and default endpoints
    pub fn new(omdb_api_key: Option<String>, tmdb_api_key: Option<String>) -> Self {
        Self {
            omdb_api_key: non_empty(omdb_api_key),
            tmdb_api_key: non_empty(tmdb_api_key),
            ..Self::default()
        }
    }

    /// Point both providers at custom base URLs (for testing)
    pub fn with_base_urls(mut self, omdb: impl Into<String>, tmdb: impl Into<String>) -> Self {
        self.omdb_base_url = omdb.into();
        self.tmdb_base_url = tmdb.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Normalizing lookup client over OMDB and TMDB
pub struct MetadataClient {
    omdb: Option<OmdbClient>,
    tmdb: Option<TmdbClient>,
}

impl MetadataClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = http_client(config.timeout);
        let omdb = non_empty(config.omdb_api_key)
            .map(|key| OmdbClient::with_http(key, config.omdb_base_url, http.clone()));
        let tmdb = non_empty(config.tmdb_api_key).map(|key| {
            TmdbClient::with_http(key, config.tmdb_base_url, config.tmdb_image_base_url, http)
        });
        Self { omdb, tmdb }
    }

    pub fn has_omdb(&self) -> bool {
        self.omdb.is_some()
    }

    pub fn has_tmdb(&self) -> bool {
        self.tmdb.is_some()
    }

    /// Look a movie up on OMDB. The IMDB id wins over the title when both
    /// are given.
    pub async fn lookup_omdb(
        &self,
        title: Option<&str>,
        imdb_id: Option<&str>,
    ) -> LookupResult<OmdbMovie> {
        let omdb = self
            .omdb
            .as_ref()
            .ok_or(LookupError::MissingCredential(Provider::Omdb))?;

        let result = match (usable(imdb_id), usable(title)) {
            (Some(id), _) => omdb.by_id(id).await,
            (None, Some(title)) => omdb.by_title(title).await,
            (None, None) => {
                return Err(LookupError::InvalidInput("Provide either title or imdbId"))
            }
        };

        result.map_err(|e| {
            warn!(error = %e, "omdb lookup failed");
            LookupError::from(e)
        })
    }

    /// Look a movie up on TMDB. A title without an id is searched first
    /// and the first hit is used; TMDB's own ordering is the only ranking.
    pub async fn lookup_tmdb(
        &self,
        movie_id: Option<u64>,
        title: Option<&str>,
    ) -> LookupResult<TmdbMovie> {
        let tmdb = self
            .tmdb
            .as_ref()
            .ok_or(LookupError::MissingCredential(Provider::Tmdb))?;

        // TMDB ids start at 1; 0 means no id was given
        let movie_id = match (movie_id.filter(|id| *id != 0), usable(title)) {
            (Some(id), _) => id,
            (None, Some(title)) => {
                let ids = tmdb.search(title).await.map_err(|e| {
                    warn!(error = %e, title, "tmdb search failed");
                    e.into_search_failure()
                })?;
                let first = ids.first().copied().ok_or(LookupError::NotFound)?;
                debug!(title, id = first, candidates = ids.len(), "tmdb search hit");
                first
            }
            (None, None) => {
                return Err(LookupError::InvalidInput("Provide either movieId or title"))
            }
        };

        tmdb.movie(movie_id).await.map_err(|e| {
            warn!(error = %e, movie_id, "tmdb details failed");
            LookupError::from(e)
        })
    }

    /// Resolve titles one at a time, in order, against OMDB if configured,
    /// else TMDB. The output has one entry per input title.
    pub async fn lookup_batch<S: AsRef<str>>(&self, titles: &[S]) -> Vec<BatchEntry> {
        info!(count = titles.len(), provider = ?self.batch_provider(), "batch lookup");

        let mut entries = Vec::with_capacity(titles.len());
        for title in titles {
            let title = title.as_ref();
            let result = match self.batch_provider() {
                Some(Provider::Omdb) => self
                    .lookup_omdb(Some(title), None)
                    .await
                    .map(MovieRecord::from),
                Some(Provider::Tmdb) => self
                    .lookup_tmdb(None, Some(title))
                    .await
                    .map(MovieRecord::from),
                None => Err(LookupError::NoApiKey),
            };
            entries.push(BatchEntry {
                title: title.to_string(),
                result,
            });
        }
        entries
    }

    /// Provider a batch dispatches to
    pub fn batch_provider(&self) -> Option<Provider> {
        if self.has_omdb() {
            Some(Provider::Omdb)
        } else if self.has_tmdb() {
            Some(Provider::Tmdb)
        } else {
            None
        }
    }
}

fn usable(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
