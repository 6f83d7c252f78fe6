//! Data structures shared across boxoffice
//!
//! - **Records**: normalized OMDB and TMDB movie records
//! - **Errors**: the lookup failure taxonomy and its contractual messages
//! - **Batch**: ordered `(title, result)` entries

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Sentinel OMDB uses (and we reuse) for fields it has no value for
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Providers
// =============================================================================

/// Upstream metadata service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Omdb,
    Tmdb,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Omdb => write!(f, "OMDB"),
            Provider::Tmdb => write!(f, "TMDB"),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a lookup produced no record.
///
/// The `Display` text is what callers see and may match on, so the literal
/// messages here are stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The provider's key is not configured
    #[error("{0} API key required")]
    MissingCredential(Provider),

    /// Neither an identifier nor a usable title was supplied
    #[error("{0}")]
    InvalidInput(&'static str),

    /// The provider answered but reported a domain error
    #[error("{0}")]
    Upstream(String),

    /// A title search returned no candidates
    #[error("Movie not found")]
    NotFound,

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Batch entry with no provider configured at all
    #[error("No API key provided")]
    NoApiKey,
}

/// Outcome of a single lookup: the normalized record or the failure reason
pub type LookupResult<T> = std::result::Result<T, LookupError>;

// =============================================================================
// Records
// =============================================================================

/// Normalized OMDB record. Every field is populated; gaps read `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmdbMovie {
    pub title: String,
    pub year: String,
    pub box_office: String,
    pub imdb_rating: String,
    pub imdb_id: String,
    pub plot: String,
    pub poster: String,
}

impl OmdbMovie {
    /// Poster URL, unless OMDB reported none
    pub fn poster_url(&self) -> Option<&str> {
        if self.poster.is_empty() || self.poster == NOT_AVAILABLE {
            None
        } else {
            Some(&self.poster)
        }
    }
}

impl fmt::Display for OmdbMovie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.year)?;
        writeln!(f, "Box Office: {}", self.box_office)?;
        writeln!(f, "IMDB Rating: {}", self.imdb_rating)?;
        write!(f, "Plot: {}", self.plot)?;
        if let Some(poster) = self.poster_url() {
            write!(f, "\nPoster: {}", poster)?;
        }
        Ok(())
    }
}

/// Normalized TMDB record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmdbMovie {
    pub title: String,
    /// First four characters of the release date, unset when TMDB has none
    pub year: Option<String>,
    /// `$`-prefixed, comma-grouped
    pub revenue: String,
    pub budget: String,
    pub tmdb_rating: f64,
    pub tmdb_id: u64,
    pub overview: String,
    /// Full image URL, only when TMDB supplied a poster path
    #[serde(rename = "posterPath")]
    pub poster_url: Option<String>,
}

impl fmt::Display for TmdbMovie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self
            .year
            .as_ref()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        writeln!(f, "{}{}", self.title, year_str)?;
        writeln!(f, "Revenue: {}", self.revenue)?;
        writeln!(f, "Budget: {}", self.budget)?;
        writeln!(f, "TMDB Rating: {:.1}", self.tmdb_rating)?;
        write!(f, "Overview: {}", self.overview)?;
        if let Some(ref poster) = self.poster_url {
            write!(f, "\nPoster: {}", poster)?;
        }
        Ok(())
    }
}

/// A record from whichever provider served the lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MovieRecord {
    Omdb(OmdbMovie),
    Tmdb(TmdbMovie),
}

impl MovieRecord {
    pub fn provider(&self) -> Provider {
        match self {
            MovieRecord::Omdb(_) => Provider::Omdb,
            MovieRecord::Tmdb(_) => Provider::Tmdb,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MovieRecord::Omdb(m) => &m.title,
            MovieRecord::Tmdb(m) => &m.title,
        }
    }
}

impl From<OmdbMovie> for MovieRecord {
    fn from(movie: OmdbMovie) -> Self {
        MovieRecord::Omdb(movie)
    }
}

impl From<TmdbMovie> for MovieRecord {
    fn from(movie: TmdbMovie) -> Self {
        MovieRecord::Tmdb(movie)
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieRecord::Omdb(m) => fmt::Display::fmt(m, f),
            MovieRecord::Tmdb(m) => fmt::Display::fmt(m, f),
        }
    }
}

// =============================================================================
// Batch
// =============================================================================

/// One entry of a batch lookup, keyed by the title that was queried
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub title: String,
    pub result: LookupResult<MovieRecord>,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Wire view of a lookup outcome: the record itself, or `{"error": ...}`
#[derive(Serialize)]
#[serde(untagged)]
enum OutcomeView<'a> {
    Record(&'a MovieRecord),
    Failure { error: String },
}

impl<'a> From<&'a LookupResult<MovieRecord>> for OutcomeView<'a> {
    fn from(result: &'a LookupResult<MovieRecord>) -> Self {
        match result {
            Ok(record) => OutcomeView::Record(record),
            Err(e) => OutcomeView::Failure {
                error: e.to_string(),
            },
        }
    }
}

impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.title, &OutcomeView::from(&self.result))?;
        map.end()
    }
}

impl fmt::Display for BatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(record) => write!(f, "[{}] {}", self.title, record),
            Err(e) => write!(f, "[{}] Error: {}", self.title, e),
        }
    }
}
