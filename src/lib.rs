//! boxoffice - movie box office lookups against OMDB and TMDB
//!
//! Looks movies up by title or id and normalizes each provider's payload
//! into a small record, or a failure with a readable reason.
//!
//! # Modules
//!
//! - `models` - Normalized records, the error taxonomy, batch entries
//! - `api` - HTTP clients (OMDB, TMDB)
//! - `client` - `MetadataClient`, the lookup entry point
//! - `config` - Config file and environment key resolution

pub mod api;
pub mod client;
pub mod config;
pub mod models;

// Re-export commonly used types
pub use models::{
    BatchEntry, LookupError, LookupResult, MovieRecord, OmdbMovie, Provider, TmdbMovie,
    NOT_AVAILABLE,
};

pub use api::{OmdbClient, TmdbClient};
pub use client::{ClientConfig, MetadataClient};
pub use config::Config;
