//! Tests for the HTTP catalog client against a local stub server

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use libris::api::CatalogClient;
use libris::model::{FetchFailure, SortSpec};
use libris::services::PageSource;

/// (url, X-API-Key header)
type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

struct StubServer {
    base_url: String,
    seen: Seen,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    /// Serve the given (status, body) responses in order, then stop
    fn spawn(responses: Vec<(u16, &'static str)>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start stub server");
        let base_url = format!("http://{}", server.server_addr());
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_thread = seen.clone();

        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let Ok(request) = server.recv() else {
                    return;
                };
                let api_key = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("X-API-Key"))
                    .map(|h| h.value.as_str().to_string());
                seen_in_thread
                    .lock()
                    .unwrap()
                    .push((request.url().to_string(), api_key));
                let response =
                    tiny_http::Response::from_string(body).with_status_code(tiny_http::StatusCode(status));
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            seen,
            handle: Some(handle),
        }
    }

    fn client(&self, api_key: Option<&str>, page_size: usize) -> CatalogClient {
        CatalogClient::new(
            self.base_url.clone(),
            api_key.map(str::to_string),
            page_size,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        // Only join when every scripted response was consumed
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

#[tokio::test]
async fn test_fetch_page_sends_offset_and_sort() {
    let stub = StubServer::spawn(vec![(
        200,
        r#"{"books": [{"id": "7", "title": "Dune", "mirrors": ["http://m/7"]}], "has_more": true}"#,
    )]);
    let client = stub.client(Some("secret"), 20);

    let page = client.fetch_page(40, SortSpec::year_desc()).await.unwrap();

    assert!(page.has_more);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, 7);
    assert_eq!(page.items[0].mirrors, vec!["http://m/7"]);

    let seen = stub.seen();
    assert_eq!(
        seen[0].0,
        "/books/latest?offset=40&limit=20&sort=year&sortmode=DESC"
    );
    assert_eq!(seen[0].1.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_default_sort_sends_no_direction() {
    let stub = StubServer::spawn(vec![(200, "[]")]);
    let client = stub.client(None, 25);

    let page = client
        .fetch_page(0, SortSpec::default_order())
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert!(!page.has_more);
    let seen = stub.seen();
    assert_eq!(seen[0].0, "/books/latest?offset=0&limit=25");
    assert_eq!(seen[0].1, None, "no API key configured");
}

#[tokio::test]
async fn test_server_error_is_api_failure() {
    let stub = StubServer::spawn(vec![(503, "catalog under maintenance")]);
    let client = stub.client(None, 25);

    let err = client
        .fetch_page(0, SortSpec::default_order())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchFailure::Api {
            code: 503,
            message: "catalog under maintenance".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_api_failure() {
    let stub = StubServer::spawn(vec![(200, "<html>not json</html>")]);
    let client = stub.client(None, 25);

    let err = client
        .fetch_page(0, SortSpec::default_order())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchFailure::Api { code: 200, .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_refused_connection_is_connection_unavailable() {
    // Grab a free port, then close it so nothing is listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = CatalogClient::new(
        format!("http://127.0.0.1:{}", port),
        None,
        25,
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client
        .fetch_page(0, SortSpec::default_order())
        .await
        .unwrap_err();

    assert!(err.is_connection(), "got {:?}", err);
    assert!(!client.ping().await);
}

#[tokio::test]
async fn test_ping_reachable_on_any_status() {
    let stub = StubServer::spawn(vec![(404, "not found")]);
    let client = stub.client(None, 25);
    assert!(client.ping().await);
}
