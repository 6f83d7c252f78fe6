//! OMDB lookup tests
//!
//! Tests parameter construction, payload-driven success/failure, and
//! transport error handling.

use std::time::Duration;

use mockito::{Matcher, Server};
use boxoffice::{ClientConfig, LookupError, MetadataClient, OmdbClient};
use tokio::net::TcpListener;

fn omdb_client(base_url: &str) -> MetadataClient {
    MetadataClient::new(
        ClientConfig::new(Some("test_key".into()), None).with_base_urls(base_url, base_url),
    )
}

fn inception_response() -> &'static str {
    r#"{
        "Title": "Inception",
        "Year": "2010",
        "Rated": "PG-13",
        "Runtime": "148 min",
        "Plot": "A thief who steals corporate secrets through the use of dream-sharing technology.",
        "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
        "imdbRating": "8.8",
        "imdbID": "tt1375666",
        "BoxOffice": "$292,576,195",
        "Response": "True"
    }"#
}

// =============================================================================
// Success Tests
// =============================================================================

#[tokio::test]
async fn test_lookup_by_title() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test_key".into()),
            Matcher::UrlEncoded("t".into(), "Inception".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(inception_response())
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let movie = client.lookup_omdb(Some("Inception"), None).await.unwrap();

    mock.assert_async().await;

    assert_eq!(movie.title, "Inception");
    assert_eq!(movie.year, "2010");
    assert_eq!(movie.box_office, "$292,576,195");
    assert_eq!(movie.imdb_rating, "8.8");
    assert_eq!(movie.imdb_id, "tt1375666");
    assert!(movie.plot.starts_with("A thief"));
    assert_eq!(movie.poster, "https://m.media-amazon.com/images/M/inception.jpg");
}

#[tokio::test]
async fn test_id_preferred_over_title() {
    let mut server = Server::new_async().await;

    let by_id = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test_key".into()),
            Matcher::UrlEncoded("i".into(), "tt1375666".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(inception_response())
        .expect(1)
        .create_async()
        .await;

    let by_title = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("t".into(), "Something Else".into()))
        .expect(0)
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let movie = client
        .lookup_omdb(Some("Something Else"), Some("tt1375666"))
        .await
        .unwrap();

    by_id.assert_async().await;
    by_title.assert_async().await;
    assert_eq!(movie.imdb_id, "tt1375666");
}

#[tokio::test]
async fn test_title_is_url_encoded() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded(
            "t".into(),
            "Crouching Tiger, Hidden Dragon & Co".into(),
        ))
        .with_status(200)
        .with_body(r#"{"Response": "True", "Title": "Crouching Tiger, Hidden Dragon"}"#)
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let movie = client
        .lookup_omdb(Some("Crouching Tiger, Hidden Dragon & Co"), None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(movie.title, "Crouching Tiger, Hidden Dragon");
}

#[tokio::test]
async fn test_missing_box_office_is_not_available() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "Title": "Metropolis",
                "Year": "1927",
                "imdbRating": "8.3",
                "imdbID": "tt0017136",
                "Plot": "In a futuristic city",
                "Poster": "N/A",
                "Response": "True"
            }"#,
        )
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let movie = client.lookup_omdb(Some("Metropolis"), None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(movie.box_office, "N/A");
    assert_eq!(movie.poster_url(), None);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[tokio::test]
async fn test_logical_failure_on_http_200() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Response": "False", "Error": "Movie not found!"}"#)
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let err = client
        .lookup_omdb(Some("Inception"), None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err, LookupError::Upstream("Movie not found!".into()));
    assert_eq!(err.to_string(), "Movie not found!");
}

#[tokio::test]
async fn test_logical_failure_on_http_401() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Response": "False", "Error": "Invalid API key!"}"#)
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let err = client.lookup_omdb(Some("Heat"), None).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.to_string(), "Invalid API key!");
}

#[tokio::test]
async fn test_non_json_body_is_request_failure() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("<html>Service Unavailable</html>")
        .create_async()
        .await;

    let client = omdb_client(&server.url());
    let err = client.lookup_omdb(Some("Heat"), None).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, LookupError::RequestFailed(_)));
    assert!(err.to_string().starts_with("Request failed: "));
}

#[tokio::test]
async fn test_connection_error_is_request_failure() {
    // Nothing listens on port 1
    let client = omdb_client("http://127.0.0.1:1/");
    let err = client.lookup_omdb(Some("Heat"), None).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Request failed: error sending request: "));
    assert!(!message.contains("test_key"));
}

#[tokio::test]
async fn test_timeout_reports_cause() {
    // Accepts connections and never answers
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let silent = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let client = MetadataClient::new(
        ClientConfig::new(Some("test_key".into()), None)
            .with_base_urls(url.clone(), url)
            .with_timeout(Duration::from_millis(300)),
    );
    let err = client.lookup_omdb(Some("Heat"), None).await.unwrap_err();
    silent.abort();

    let message = err.to_string();
    assert!(message.starts_with("Request failed: "));
    assert_ne!(message, "Request failed: error sending request");
    assert!(message.contains("timed out"), "unexpected message: {}", message);
    assert!(!message.contains("test_key"));
}

#[tokio::test]
async fn test_provider_client_by_id() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test_key".into()),
            Matcher::UrlEncoded("i".into(), "tt1375666".into()),
        ]))
        .with_status(200)
        .with_body(inception_response())
        .create_async()
        .await;

    let omdb = OmdbClient::with_base_url("test_key", server.url());
    let movie = omdb.by_id("tt1375666").await.unwrap();

    mock.assert_async().await;
    assert_eq!(movie.title, "Inception");
    assert_eq!(movie.imdb_id, "tt1375666");
}

#[tokio::test]
async fn test_no_key_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = MetadataClient::new(
        ClientConfig::new(None, Some("tmdb_key".into())).with_base_urls(server.url(), server.url()),
    );
    let err = client
        .lookup_omdb(Some("Inception"), Some("tt1375666"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.to_string(), "OMDB API key required");
}

#[tokio::test]
async fn test_no_title_or_id() {
    let client = omdb_client("http://127.0.0.1:1/");
    let err = client.lookup_omdb(None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Provide either title or imdbId");
}
