//! API clients for the upstream metadata services
//!
//! - OMDB: title-or-id lookup, single request
//! - TMDB: search-then-details lookup

pub mod omdb;
pub mod tmdb;

pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;

use std::time::Duration;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("boxoffice/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Transport failure text with the cause chain attached. The URL is dropped
/// because it carries the API key.
pub(crate) fn describe_transport_error(e: reqwest::Error) -> String {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = std::error::Error::source(cause);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_error_keeps_cause() {
        // Nothing listens on port 1
        let err = http_client(DEFAULT_TIMEOUT)
            .get("http://127.0.0.1:1/?apikey=secret")
            .send()
            .await
            .unwrap_err();

        let message = describe_transport_error(err);
        assert_ne!(message, "error sending request");
        assert!(message.starts_with("error sending request: "));
        assert!(!message.contains("secret"));
    }
}
