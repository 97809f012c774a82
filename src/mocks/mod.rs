//! Mock implementations for testing.
//!
//! This module provides a mock transport and canned store answers for
//! exercising the services without a live HCP namespace.

mod transport;

pub use transport::{MockResponse, MockResponseBuilder, MockTransport};

use crate::config::HcpConfig;
use crate::types::ObjectRequest;

/// Test fixtures for common scenarios.
pub struct TestFixtures;

impl TestFixtures {
    /// Authorization value used by fixture configurations and requests.
    pub const AUTHORIZATION: &'static str = "HCP dGVzdHVzZXI=:29def7dbc8892a9389ebc7a5210dd844";

    /// REST endpoint used by fixture configurations.
    pub const REST_URL: &'static str = "https://ns1.tenant.hcp.example.com/rest";

    /// Create a test configuration.
    pub fn config() -> HcpConfig {
        Self::config_with_prefix("/")
    }

    /// Create a test configuration with a write-target prefix.
    pub fn config_with_prefix(prepend_path: &str) -> HcpConfig {
        HcpConfig::builder()
            .rest_url(Self::REST_URL)
            .expect("fixture URL is valid")
            .authorization(Self::AUTHORIZATION)
            .prepend_path(prepend_path)
            .build()
            .expect("fixture configuration is valid")
    }

    /// Create a request for `path` under the fixture endpoint.
    pub fn request(path: &str) -> ObjectRequest {
        let path = path.trim_start_matches('/');
        ObjectRequest::new(format!("{}/{}", Self::REST_URL, path), Self::AUTHORIZATION)
    }

    /// Headers of a successful read.
    pub fn read_headers() -> Vec<(String, String)> {
        pairs(&[
            ("X-HCP-Time", "1700000000"),
            ("Server", "HCP V7.2"),
            ("X-HCP-Hash", "SHA-256 9F86D081884C7D659A2FEAA0C55AD015"),
            ("X-HCP-ServicedBySystem", "hcp.example.com"),
            ("X-RequestId", "A1B2C3D4E5F60718"),
            ("Content-Type", "text/plain"),
            ("Content-Length", "12"),
            ("X-HCP-Type", "object"),
            ("X-HCP-Size", "12"),
            ("X-HCP-VersionId", "87178274129409"),
            ("X-HCP-IngestTime", "1699999000"),
            ("X-HCP-RetentionClass", ""),
            ("X-HCP-RetentionString", "Deletion Allowed"),
            ("X-HCP-Retention", "0"),
            ("X-HCP-RetentionHold", "false"),
            ("X-HCP-Shred", "false"),
            ("X-HCP-DPL", "2"),
            ("X-HCP-Index", "true"),
            ("X-HCP-Custom-Metadata", "false"),
            ("X-HCP-CustomMetadataAnnotations", ""),
            ("X-HCP-Owner", "alice"),
            ("X-HCP-Domain", ""),
            ("X-HCP-Replicated", "false"),
            ("X-HCP-ReplicationCollision", "false"),
            ("X-HCP-ChangeTimeString", "2023-11-14T22:13:20+0000"),
        ])
    }

    /// Headers of a successful create.
    pub fn create_headers() -> Vec<(String, String)> {
        pairs(&[
            ("X-HCP-Time", "1700000000"),
            ("Server", "HCP V7.2"),
            ("X-RequestId", "A1B2C3D4E5F60719"),
            ("Location", "/rest/docs/a.txt"),
            ("X-ArcHash", "SHA-256 9F86D081884C7D659A2FEAA0C55AD015"),
            ("X-ArcClusterTime", "1700000001"),
            ("X-HCP-VersionId", "87178274129410"),
        ])
    }

    /// A listing with three entries: two objects and a subdirectory.
    pub fn listing_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<directory path="/rest/docs" utf8Path="/rest/docs" parentDir="/rest" utf8ParentDir="/rest"
           dirDeleted="false" showDeleted="false" namespaceName="ns1" utf8NamespaceName="ns1">
  <entry urlName="a.txt" utf8Name="a.txt" type="object" size="12" hashScheme="SHA-256"
         hash="9F86D081884C7D659A2FEAA0C55AD015" retention="0" retentionString="Deletion Allowed"
         retentionClass="" ingestTime="1699999000" ingestTimeString="11/14/2023 9:56PM"
         hold="false" shred="false" dpl="2" index="true" customMetadata="false"
         version="87178274129409" state="created" etag="&quot;9f86d081&quot;"
         versionCreateTimeMilliseconds="1699999000123" customMetadataAnnotations="false"
         replicated="false" changeTimeMilliseconds="1699999000456"
         changeTimeString="2023-11-14T21:56:40+0000" owner="alice" domain="" hasAcl="false"/>
  <entry urlName="b.txt" utf8Name="b.txt" type="object" size="0" hashScheme="SHA-256"
         hash="E3B0C44298FC1C149AFBF4C8996FB924" hold="true" shred="true" dpl="2"/>
  <entry urlName="archive" utf8Name="archive" type="directory"/>
</directory>"#
    }

    /// A listing of an empty directory.
    pub fn empty_listing_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<directory path="/rest/empty" utf8Path="/rest/empty" parentDir="/rest" utf8ParentDir="/rest"
           dirDeleted="false" showDeleted="false" namespaceName="ns1" utf8NamespaceName="ns1"/>"#
    }

    /// A truncated listing body.
    pub fn malformed_xml() -> &'static str {
        r#"<directory path="/rest/docs"><entry urlName="a.txt" "#
    }

    /// A small custom metadata document.
    pub fn custom_metadata_xml() -> &'static str {
        "<metadata><project>apollo</project><owner>alice</owner></metadata>"
    }
}

fn pairs(headers: &[(&str, &str)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
