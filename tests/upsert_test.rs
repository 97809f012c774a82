//! Integration tests for upsert (probe, delete, create).

use async_trait::async_trait;
use hcp::error::{HcpError, TransferError};
use hcp::mocks::{MockResponse, MockTransport, TestFixtures};
use hcp::services::ObjectsService;
use hcp::transfer::{bytes_body, BodySource, BodyStream, FileSource};
use hcp::types::*;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn create_test_service_with_transport(transport: Arc<MockTransport>) -> ObjectsService {
    ObjectsService::new(Arc::new(TestFixtures::config()), transport)
}

/// Source that counts how many times it was opened.
struct CountingSource {
    data: &'static str,
    opens: AtomicUsize,
}

impl CountingSource {
    fn new(data: &'static str) -> Self {
        Self {
            data,
            opens: AtomicUsize::new(0),
        }
    }

    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BodySource for CountingSource {
    async fn open(&self, buffer_size: usize) -> Result<BodyStream, HcpError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(bytes_body(self.data, buffer_size))
    }

    fn describe(&self) -> String {
        "counting source".to_string()
    }
}

#[tokio::test]
async fn test_upsert_absent_target_creates() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::status(404),
        MockResponse::created().with_headers(TestFixtures::create_headers()),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let source = CountingSource::new("new contents");

    let response = service
        .upsert(&TestFixtures::request("docs/a.txt"), &source, 4)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::Created);
    assert_eq!(response.location.as_deref(), Some("/rest/docs/a.txt"));
    assert_eq!(transport.methods(), vec!["HEAD", "PUT"]);
    assert_eq!(source.opens(), 1);
    assert_eq!(transport.last_request().unwrap().body.unwrap(), "new contents");
}

#[tokio::test]
async fn test_upsert_existing_target_is_replaced() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok().with_headers(TestFixtures::read_headers()),
        MockResponse::ok(),
        MockResponse::created().with_headers(TestFixtures::create_headers()),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let source = CountingSource::new("replacement");

    let response = service
        .upsert(&TestFixtures::request("docs/a.txt"), &source, 1024)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::Created);
    assert!(response.success());
    assert_eq!(response.version_id.as_deref(), Some("87178274129410"));
    assert_eq!(transport.methods(), vec!["HEAD", "DELETE", "PUT"]);
    assert_eq!(source.opens(), 1);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert!(urls
        .iter()
        .all(|u| u == "https://ns1.tenant.hcp.example.com/rest/docs/a.txt"));
}

#[tokio::test]
async fn test_upsert_failed_delete_stops_before_create() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok(),
        MockResponse::status(403),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let source = CountingSource::new("never sent");

    let response = service
        .upsert(&TestFixtures::request("held.txt"), &source, 1024)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::Forbidden);
    assert!(!response.success());
    assert_eq!(response.explanation(), "Forbidden");
    assert_eq!(response.location, None);
    assert_eq!(transport.methods(), vec!["HEAD", "DELETE"]);
    assert_eq!(source.opens(), 0);
}

#[tokio::test]
async fn test_upsert_non_ok_delete_success_stops() {
    // Only an OK delete is followed by a create.
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok(),
        MockResponse::status(204),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let source = CountingSource::new("never sent");

    let response = service
        .upsert(&TestFixtures::request("a.txt"), &source, 1024)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::NoContent);
    assert_eq!(transport.request_count(), 2);
    assert_eq!(source.opens(), 0);
}

#[tokio::test]
async fn test_upsert_existence_check_failure_status_creates() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::status(500),
        MockResponse::status(413),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let source = CountingSource::new("too big");

    let response = service
        .upsert(&TestFixtures::request("big.bin"), &source, 1024)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::FileTooLarge);
    assert_eq!(transport.methods(), vec!["HEAD", "PUT"]);
}

#[tokio::test]
async fn test_upsert_existence_check_transport_failure() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::transport_failure("timed out"),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let source = CountingSource::new("unused");

    let err = service
        .upsert(&TestFixtures::request("a.txt"), &source, 1024)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(transport.request_count(), 1);
    assert_eq!(source.opens(), 0);
}

#[tokio::test]
async fn test_upsert_missing_file_source() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::status(404)]));
    let service = create_test_service_with_transport(transport.clone());
    let source = FileSource::new("/nonexistent/upload.bin");

    let err = service
        .upsert(&TestFixtures::request("a.txt"), &source, 1024)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HcpError::Transfer(TransferError::SourceUnavailable { .. })
    ));
    assert_eq!(transport.methods(), vec!["HEAD"]);
}

#[tokio::test]
async fn test_put_upsert_mode_with_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"file body").unwrap();

    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok(),
        MockResponse::ok(),
        MockResponse::created().with_headers(TestFixtures::create_headers()),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let target = TestFixtures::config_with_prefix("uploads")
        .target_request("report.csv")
        .unwrap();

    let response = service
        .put(&target, &FileSource::new(file.path()), PutMode::Upsert)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::Created);
    let recorded = transport.last_request().unwrap();
    assert_eq!(
        recorded.url,
        "https://ns1.tenant.hcp.example.com/rest/uploads/report.csv"
    );
    assert_eq!(recorded.body.unwrap(), "file body");
}

#[tokio::test]
async fn test_upsert_then_list_and_read() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        // upsert of an existing object
        MockResponse::ok(),
        MockResponse::ok(),
        MockResponse::created().with_headers(TestFixtures::create_headers()),
        // list of the parent directory
        MockResponse::ok_with_body(TestFixtures::listing_xml()),
        // head of the new object
        MockResponse::ok().with_headers(TestFixtures::read_headers()),
    ]));
    let service = create_test_service_with_transport(transport.clone());
    let request = TestFixtures::request("docs/a.txt");

    let created = service
        .upsert(&request, &CountingSource::new("hello, world"), 1024)
        .await
        .unwrap();
    assert!(created.success());

    let listing = service.list(&TestFixtures::request("docs")).await.unwrap();
    assert!(listing
        .entries()
        .iter()
        .any(|e| e.utf8_name.as_deref() == Some("a.txt")));

    let read = service.head(&request).await.unwrap();
    assert_eq!(read.size, Some(12));

    assert_eq!(
        transport.methods(),
        vec!["HEAD", "DELETE", "PUT", "GET", "HEAD"]
    );
}

#[tokio::test]
async fn test_upsert_create_path_decodes_create_headers() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::status(404),
        MockResponse::created()
            .with_header("Location", "/ns/obj")
            .with_header("X-ArcHash", "SHA256 abc123")
            .with_header("X-ArcClusterTime", "1000")
            .with_header("X-HCP-VersionId", "v1"),
    ]));
    let service = create_test_service_with_transport(transport.clone());

    let response = service
        .upsert(&TestFixtures::request("ns/obj"), &CountingSource::new("body"), 1024)
        .await
        .unwrap();

    assert_eq!(response.status(), Status::Created);
    assert!(response.success());
    assert_eq!(response.location.as_deref(), Some("/ns/obj"));
    assert_eq!(response.arc_hash.as_deref(), Some("abc123"));
    assert_eq!(response.cluster_time, Some(1000));
    assert_eq!(response.version_id.as_deref(), Some("v1"));
    assert_eq!(transport.methods(), vec!["HEAD", "PUT"]);
}
