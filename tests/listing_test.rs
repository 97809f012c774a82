//! Integration tests for directory listings.

use hcp::mocks::{MockResponse, MockTransport, TestFixtures};
use hcp::services::ObjectsService;
use hcp::types::*;
use std::sync::Arc;

fn create_test_service_with_transport(transport: Arc<MockTransport>) -> ObjectsService {
    ObjectsService::new(Arc::new(TestFixtures::config()), transport)
}

#[tokio::test]
async fn test_list_directory() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok_with_body(TestFixtures::listing_xml())
            .with_header("Content-Type", "application/xml")
            .with_header("X-RequestId", "LIST1"),
    ]));
    let service = create_test_service_with_transport(transport.clone());

    let response = service.list(&TestFixtures::request("docs")).await.unwrap();

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.base.request_id.as_deref(), Some("LIST1"));
    assert_eq!(response.directory.path.as_deref(), Some("/rest/docs"));
    assert_eq!(response.directory.namespace_name.as_deref(), Some("ns1"));

    let names: Vec<_> = response
        .entries()
        .iter()
        .map(|e| e.url_name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "archive"]);

    let first = &response.entries()[0];
    assert_eq!(first.size, Some(12));
    assert_eq!(first.etag.as_deref(), Some("\"9f86d081\""));
    assert_eq!(first.version_create_time, Some(1_699_999_000_123));
    assert!(first.change_time_utc().is_some());

    let second = &response.entries()[1];
    assert_eq!(second.hold, Some(true));
    assert_eq!(second.owner, None);

    let recorded = transport.last_request().unwrap();
    assert_eq!(recorded.method, "GET");
    assert_eq!(recorded.url, "https://ns1.tenant.hcp.example.com/rest/docs/");
}

#[tokio::test]
async fn test_list_directory_trailing_slash_kept() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok_with_body(TestFixtures::empty_listing_xml()),
    ]));
    let service = create_test_service_with_transport(transport.clone());

    service.list(&TestFixtures::request("docs/")).await.unwrap();

    assert_eq!(
        transport.last_request().unwrap().url,
        "https://ns1.tenant.hcp.example.com/rest/docs/"
    );
}

#[tokio::test]
async fn test_list_rows() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok_with_body(TestFixtures::listing_xml()),
    ]));
    let service = create_test_service_with_transport(transport);

    let response = service.list(&TestFixtures::request("docs")).await.unwrap();
    let rows = response.output_rows();

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.get("Status").and_then(FieldValue::as_str), Some("OK"));
        assert_eq!(row.get("path").and_then(FieldValue::as_str), Some("/rest/docs"));
        assert_eq!(rows[0].len(), row.len());
    }
    assert_eq!(rows[2].get("type").and_then(FieldValue::as_str), Some("directory"));
    assert!(rows[2].get("size").unwrap().is_null());
}

#[tokio::test]
async fn test_list_empty_directory() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok_with_body(TestFixtures::empty_listing_xml()),
    ]));
    let service = create_test_service_with_transport(transport);

    let response = service.list(&TestFixtures::request("empty")).await.unwrap();

    assert!(response.success());
    assert!(response.entries().is_empty());
    assert_eq!(response.directory.path.as_deref(), Some("/rest/empty"));
    assert!(response.output_rows().is_empty());
}

#[tokio::test]
async fn test_list_not_found_has_no_entries() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::status(404).with_body(TestFixtures::listing_xml()),
    ]));
    let service = create_test_service_with_transport(transport);

    let response = service.list(&TestFixtures::request("gone")).await.unwrap();

    assert_eq!(response.status(), Status::NotFound);
    assert!(response.entries().is_empty());

    let rows = response.output_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Status").and_then(FieldValue::as_str), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_list_malformed_body_is_decode_error() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok_with_body(TestFixtures::malformed_xml()),
    ]));
    let service = create_test_service_with_transport(transport);

    let err = service.list(&TestFixtures::request("docs")).await.unwrap_err();

    assert!(err.is_decode());
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_list_into_entries() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok_with_body(TestFixtures::listing_xml()),
    ]));
    let service = create_test_service_with_transport(transport);

    let entries = service
        .list(&TestFixtures::request("docs"))
        .await
        .unwrap()
        .into_entries();

    let objects = entries
        .iter()
        .filter(|e| e.entry_type.as_deref() == Some("object"))
        .count();
    assert_eq!(objects, 2);
}
