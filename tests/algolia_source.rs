//! Integration tests for the Algolia story source against a mock HTTP server.

use hnfeed::source::{AlgoliaSource, FetchError, StorySource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn source_for(server: &MockServer) -> AlgoliaSource {
    AlgoliaSource::new(&format!("{}/api/v1", server.uri())).unwrap()
}

#[tokio::test]
async fn test_fetch_page_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search_by_date"))
        .and(query_param("tags", "story"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                {
                    "objectID": "41000001",
                    "title": "Show HN: A",
                    "author": "alice",
                    "url": "https://a.example.com",
                    "created_at": "2024-09-10T12:00:00Z",
                    "_tags": ["story", "author_alice", "show_hn"],
                    "points": 12
                },
                {
                    "objectID": "41000002",
                    "title": "B",
                    "author": "bob",
                    "url": "https://b.example.com",
                    "created_at": "2024-09-10T11:59:00Z",
                    "_tags": ["story"]
                }
            ],
            "nbHits": 2,
            "page": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stories = source_for(&mock_server).await.fetch_page(0).await.unwrap();
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].id, "41000001");
    assert_eq!(stories[0].title, "Show HN: A");
    assert_eq!(stories[0].tags, vec!["story", "author_alice", "show_hn"]);
    assert_eq!(stories[1].author, "bob");
}

#[tokio::test]
async fn test_fetch_requested_page_number() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search_by_date"))
        .and(query_param("page", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stories = source_for(&mock_server).await.fetch_page(7).await.unwrap();
    assert!(stories.is_empty());
}

#[tokio::test]
async fn test_null_fields_become_empty() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                { "objectID": "1", "title": "Ask HN: Anything?", "author": "carol",
                  "url": null, "created_at": "2024-09-10T12:00:00Z", "_tags": null },
                { "objectID": "2" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let stories = source_for(&mock_server).await.fetch_page(0).await.unwrap();
    assert_eq!(stories[0].url, "");
    assert!(stories[0].tags.is_empty());
    assert_eq!(stories[1].title, "");
    assert_eq!(stories[1].author, "");
}

#[tokio::test]
async fn test_http_404_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    match source_for(&mock_server).await.fetch_page(0).await {
        Err(FetchError::HttpStatus(404)) => {}
        other => panic!("Expected HttpStatus(404), got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ \"hits\": [ oops"))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server)
        .await
        .fetch_page(0)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    assert!(err.to_string().starts_with("Unexpected response"));
}

#[tokio::test]
async fn test_missing_hits_key_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "rate limited" })))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server)
        .await
        .fetch_page(0)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mock_server = MockServer::start().await;
    let body = format!("{{\"hits\":[],\"pad\":\"{}\"}}", "x".repeat(10 * 1024 * 1024 + 1));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server)
        .await
        .fetch_page(0)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::ResponseTooLarge));
}

#[tokio::test]
async fn test_stalled_body_times_out() {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Headers promise 100 bytes; only 10 arrive before the server goes quiet.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"hits\":[",
            )
            .await
            .unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    let source = AlgoliaSource::new(&format!("http://127.0.0.1:{}", addr.port()))
        .unwrap()
        .with_timeout(Duration::from_millis(300));

    let result = tokio::time::timeout(Duration::from_secs(10), source.fetch_page(0))
        .await
        .expect("fetch_page should give up on its own");
    assert!(matches!(result, Err(FetchError::Timeout)));

    server.abort();
}
