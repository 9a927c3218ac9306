//! Pagination properties of the page lister against a mocked listing
//! endpoint: start offsets advance by the batch size, remote order is
//! preserved, a short batch terminates the walk, and a transport failure
//! mid-listing yields the pages accumulated so far.

use std::path::Path;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use confluence_export::client::ConfluenceClient;
use confluence_export::config::ExportConfig;
use confluence_export::contract::PageSource;

fn test_config(base_url: &str, output_dir: &Path, page_size: usize) -> ExportConfig {
    ExportConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        username: "user@example.com".to_string(),
        api_token: "token-123".to_string(),
        space_key: "DOCS".to_string(),
        output_dir: output_dir.to_path_buf(),
        page_size,
        max_pages: None,
        list_delay_ms: 0,
        page_delay_ms: 0,
    }
}

fn listing_body(ids: &[(&str, &str)]) -> serde_json::Value {
    json!({
        "results": ids
            .iter()
            .map(|(id, title)| json!({ "id": id, "title": title }))
            .collect::<Vec<_>>()
    })
}

async fn mount_batch(server: &MockServer, start: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/wiki/rest/api/content"))
        .and(query_param("spaceKey", "DOCS"))
        .and(query_param("type", "page"))
        .and(query_param("status", "current"))
        .and(query_param("limit", "2"))
        .and(query_param("start", start))
        .and(query_param("expand", "space,version,ancestors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn walks_every_batch_in_order_until_a_short_one() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_batch(&server, "0", listing_body(&[("1", "A"), ("2", "B")])).await;
    mount_batch(&server, "2", listing_body(&[("3", "C"), ("4", "D")])).await;
    mount_batch(&server, "4", listing_body(&[("5", "E")])).await;

    let client = ConfluenceClient::new(&test_config(&server.uri(), out.path(), 2)).unwrap();
    let pages = client.list_pages("DOCS").await;

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn returns_partial_results_when_a_batch_fails() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_batch(&server, "0", listing_body(&[("1", "A"), ("2", "B")])).await;
    Mock::given(method("GET"))
        .and(path("/wiki/rest/api/content"))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = ConfluenceClient::new(&test_config(&server.uri(), out.path(), 2)).unwrap();
    let pages = client.list_pages("DOCS").await;

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"], "accumulated pages must survive the failure");
}

#[tokio::test]
async fn empty_space_yields_an_empty_sequence() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_batch(&server, "0", listing_body(&[])).await;

    let client = ConfluenceClient::new(&test_config(&server.uri(), out.path(), 2)).unwrap();
    let pages = client.list_pages("DOCS").await;

    assert!(pages.is_empty());
}

#[tokio::test]
async fn page_cap_truncates_the_listing_and_stops_requesting() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_batch(&server, "0", listing_body(&[("1", "A"), ("2", "B")])).await;
    mount_batch(&server, "2", listing_body(&[("3", "C"), ("4", "D")])).await;
    // No mock for start=4: reaching the cap must end the walk.

    let mut config = test_config(&server.uri(), out.path(), 2);
    config.max_pages = Some(3);
    let client = ConfluenceClient::new(&config).unwrap();
    let pages = client.list_pages("DOCS").await;

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}
