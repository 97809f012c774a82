//! Response types for HCP operations.
//!
//! Every operation returns one of these. The common store metadata lives in
//! [`ResponseBase`], which each response embeds; [`HcpResponse`] is the tagged
//! union over all of them.

use super::fields::{FieldValue, OutputRow};
use super::status::Status;
use crate::metadata::headers;
use crate::xml::attrs;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Placeholder stored as the arc hash when the compound hash header does not
/// carry both a scheme and a value.
pub const UNKNOWN_ARC_HASH: &str = "unknown";

/// Cluster time stored when the cluster-time header is present but not numeric.
pub const UNPARSABLE_CLUSTER_TIME: i64 = -1;

/// Fields shared by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBase {
    status: Status,
    success: bool,
    explanation: String,
    /// Server time, seconds since the epoch.
    pub time: Option<i64>,
    /// Server identity.
    pub server: Option<String>,
    /// Content hash reported by the store.
    pub hash: Option<String>,
    /// Identifier of the system that serviced the request.
    pub serviced_by: Option<String>,
    /// Request identifier.
    pub request_id: Option<String>,
    /// Content type.
    pub content_type: Option<String>,
    /// Content length.
    pub content_length: Option<i64>,
}

impl ResponseBase {
    /// Create a response with the given outcome and no metadata.
    pub fn new(status: Status, explanation: impl Into<String>) -> Self {
        Self {
            status,
            success: status.is_success(),
            explanation: explanation.into(),
            time: None,
            server: None,
            hash: None,
            serviced_by: None,
            request_id: None,
            content_type: None,
            content_length: None,
        }
    }

    /// Set the outcome. `success` is recomputed from the status.
    pub fn set_status(&mut self, status: Status, explanation: impl Into<String>) {
        self.status = status;
        self.success = status.is_success();
        self.explanation = explanation.into();
    }

    /// Outcome of the operation.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the outcome counts as a success.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Human-readable reason, usually the HTTP reason phrase.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Server time as a UTC timestamp.
    pub fn time_utc(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(|t| Utc.timestamp_opt(t, 0).single())
    }

    fn push_fields(&self, row: &mut OutputRow) {
        row.push(
            headers::STATUS_FIELD,
            FieldValue::String(self.status.to_string()),
        );
        row.push(headers::X_HCP_TIME, self.time);
        row.push(headers::SERVER, &self.server);
        row.push(headers::X_HCP_HASH, &self.hash);
        row.push(headers::X_HCP_SERVICED_BY_SYSTEM, &self.serviced_by);
        row.push(headers::X_REQUEST_ID, &self.request_id);
        row.push(headers::CONTENT_TYPE, &self.content_type);
        row.push(headers::CONTENT_LENGTH, self.content_length);
    }
}

/// Common accessors over every response type.
pub trait Response {
    /// Shared base fields.
    fn base(&self) -> &ResponseBase;

    /// Named output rows for a row-driven pipeline.
    fn output_rows(&self) -> Vec<OutputRow>;

    /// Outcome of the operation.
    fn status(&self) -> Status {
        self.base().status()
    }

    /// Whether the outcome counts as a success.
    fn success(&self) -> bool {
        self.base().success()
    }

    /// Human-readable reason.
    fn explanation(&self) -> &str {
        self.base().explanation()
    }
}

/// Result of a Get (GET or HEAD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadResponse {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ResponseBase,
    /// MIME type of the object.
    pub object_type: Option<String>,
    /// Object size in bytes.
    pub size: Option<i64>,
    /// Version identifier.
    pub version_id: Option<String>,
    /// Ingest time, seconds since the epoch.
    pub ingest_time: Option<i64>,
    /// Named retention class.
    pub retention_class: Option<String>,
    /// Human-readable retention.
    pub retention_string: Option<String>,
    /// Retention, seconds since the epoch.
    pub retention: Option<i64>,
    /// Litigation hold.
    pub hold: Option<bool>,
    /// Secure delete on removal.
    pub shred: Option<bool>,
    /// Data protection level.
    pub dpl: Option<i64>,
    /// Indexed for search.
    pub indexed: Option<bool>,
    /// Custom metadata is attached.
    pub custom_metadata: Option<bool>,
    /// Raw custom metadata annotations header.
    pub custom_metadata_annotations: Option<String>,
    /// Object owner.
    pub owner: Option<String>,
    /// Owner domain.
    pub domain: Option<String>,
    /// Object is replicated.
    pub replicated: Option<bool>,
    /// Object is a replication collision.
    pub replication_collision: Option<bool>,
    /// Human-readable change time.
    pub change_time_string: Option<String>,
}

impl ReadResponse {
    /// Create a response with the given outcome and no metadata.
    pub fn new(status: Status, explanation: impl Into<String>) -> Self {
        Self::from_base(ResponseBase::new(status, explanation))
    }

    /// Wrap decoded base fields.
    pub fn from_base(base: ResponseBase) -> Self {
        Self {
            base,
            object_type: None,
            size: None,
            version_id: None,
            ingest_time: None,
            retention_class: None,
            retention_string: None,
            retention: None,
            hold: None,
            shred: None,
            dpl: None,
            indexed: None,
            custom_metadata: None,
            custom_metadata_annotations: None,
            owner: None,
            domain: None,
            replicated: None,
            replication_collision: None,
            change_time_string: None,
        }
    }

    /// Ingest time as a UTC timestamp.
    pub fn ingest_time_utc(&self) -> Option<DateTime<Utc>> {
        self.ingest_time
            .and_then(|t| Utc.timestamp_opt(t, 0).single())
    }
}

impl Response for ReadResponse {
    fn base(&self) -> &ResponseBase {
        &self.base
    }

    fn output_rows(&self) -> Vec<OutputRow> {
        let mut row = OutputRow::new();
        self.base.push_fields(&mut row);
        row.push(headers::X_HCP_TYPE, &self.object_type);
        row.push(headers::X_HCP_SIZE, self.size);
        row.push(headers::X_HCP_VERSION_ID, &self.version_id);
        row.push(headers::X_HCP_INGEST_TIME, self.ingest_time);
        row.push(headers::X_HCP_RETENTION_CLASS, &self.retention_class);
        row.push(headers::X_HCP_RETENTION_STRING, &self.retention_string);
        row.push(headers::X_HCP_RETENTION, self.retention);
        row.push(headers::X_HCP_RETENTION_HOLD, self.hold);
        row.push(headers::X_HCP_SHRED, self.shred);
        row.push(headers::X_HCP_DPL, self.dpl);
        row.push(headers::X_HCP_INDEX, self.indexed);
        row.push(headers::X_HCP_CUSTOM_METADATA, self.custom_metadata);
        row.push(
            headers::X_HCP_CUSTOM_METADATA_ANNOTATIONS,
            &self.custom_metadata_annotations,
        );
        row.push(headers::X_HCP_OWNER, &self.owner);
        row.push(headers::X_HCP_DOMAIN, &self.domain);
        row.push(headers::X_HCP_REPLICATED, self.replicated);
        row.push(
            headers::X_HCP_REPLICATION_COLLISION,
            self.replication_collision,
        );
        row.push(headers::X_HCP_CHANGE_TIME_STRING, &self.change_time_string);
        vec![row]
    }
}

/// Result of a Create, an Upsert, or a metadata update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateResponse {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ResponseBase,
    /// URL of the resulting object.
    pub location: Option<String>,
    /// Content hash reported by the cluster, or [`UNKNOWN_ARC_HASH`].
    pub arc_hash: Option<String>,
    /// Cluster time, or [`UNPARSABLE_CLUSTER_TIME`] if the header was garbled.
    pub cluster_time: Option<i64>,
    /// Version identifier.
    pub version_id: Option<String>,
}

impl CreateResponse {
    /// Create a response with the given outcome and no metadata.
    pub fn new(status: Status, explanation: impl Into<String>) -> Self {
        Self::from_base(ResponseBase::new(status, explanation))
    }

    /// Wrap decoded base fields.
    pub fn from_base(base: ResponseBase) -> Self {
        Self {
            base,
            location: None,
            arc_hash: None,
            cluster_time: None,
            version_id: None,
        }
    }

    /// Failure result synthesized from another call's outcome, such as the
    /// delete step of an upsert.
    pub fn failed(status: Status, explanation: impl Into<String>) -> Self {
        Self::new(status, explanation)
    }
}

impl Response for CreateResponse {
    fn base(&self) -> &ResponseBase {
        &self.base
    }

    fn output_rows(&self) -> Vec<OutputRow> {
        let mut row = OutputRow::new();
        self.base.push_fields(&mut row);
        row.push(headers::LOCATION, &self.location);
        row.push(headers::X_ARC_HASH, &self.arc_hash);
        row.push(headers::X_ARC_CLUSTER_TIME, self.cluster_time);
        row.push(headers::X_HCP_VERSION_ID, &self.version_id);
        vec![row]
    }
}

/// Result of a Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ResponseBase,
}

impl DeleteResponse {
    /// Create a response with the given outcome and no metadata.
    pub fn new(status: Status, explanation: impl Into<String>) -> Self {
        Self {
            base: ResponseBase::new(status, explanation),
        }
    }
}

impl Response for DeleteResponse {
    fn base(&self) -> &ResponseBase {
        &self.base
    }

    fn output_rows(&self) -> Vec<OutputRow> {
        let mut row = OutputRow::new();
        self.base.push_fields(&mut row);
        vec![row]
    }
}

/// Directory-level attributes of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryAttributes {
    /// URL-encoded directory path.
    pub path: Option<String>,
    /// UTF-8 directory path.
    pub utf8_path: Option<String>,
    /// URL-encoded parent directory.
    pub parent_dir: Option<String>,
    /// UTF-8 parent directory.
    pub utf8_parent_dir: Option<String>,
    /// The directory itself is deleted.
    pub dir_deleted: Option<bool>,
    /// Deleted entries are included.
    pub show_deleted: Option<bool>,
    /// Namespace name.
    pub namespace_name: Option<String>,
    /// UTF-8 namespace name.
    pub utf8_namespace_name: Option<String>,
}

impl DirectoryAttributes {
    fn push_fields(&self, row: &mut OutputRow) {
        row.push(attrs::PATH, &self.path);
        row.push(attrs::UTF8_PATH, &self.utf8_path);
        row.push(attrs::PARENT_DIR, &self.parent_dir);
        row.push(attrs::UTF8_PARENT_DIR, &self.utf8_parent_dir);
        row.push(attrs::DIR_DELETED, self.dir_deleted);
        row.push(attrs::SHOW_DELETED, self.show_deleted);
        row.push(attrs::NAMESPACE_NAME, &self.namespace_name);
        row.push(attrs::UTF8_NAMESPACE_NAME, &self.utf8_namespace_name);
    }
}

/// One object or directory in a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    /// URL-encoded name.
    pub url_name: Option<String>,
    /// UTF-8 name.
    pub utf8_name: Option<String>,
    /// Entry type (`object` or `directory`).
    pub entry_type: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Hash algorithm.
    pub hash_scheme: Option<String>,
    /// Content hash.
    pub hash: Option<String>,
    /// Retention, seconds since the epoch.
    pub retention: Option<i64>,
    /// Human-readable retention.
    pub retention_string: Option<String>,
    /// Named retention class.
    pub retention_class: Option<String>,
    /// Ingest time, seconds since the epoch.
    pub ingest_time: Option<i64>,
    /// Human-readable ingest time.
    pub ingest_time_string: Option<String>,
    /// Litigation hold.
    pub hold: Option<bool>,
    /// Secure delete on removal.
    pub shred: Option<bool>,
    /// Data protection level.
    pub dpl: Option<String>,
    /// Indexed for search.
    pub indexed: Option<bool>,
    /// Custom metadata is attached.
    pub custom_metadata: Option<bool>,
    /// Version label.
    pub version: Option<String>,
    /// Version state.
    pub state: Option<String>,
    /// Entity tag.
    pub etag: Option<String>,
    /// Version create time, milliseconds since the epoch.
    pub version_create_time: Option<i64>,
    /// Custom metadata annotations are attached.
    pub custom_metadata_annotations: Option<bool>,
    /// Entry is replicated.
    pub replicated: Option<bool>,
    /// Change time, milliseconds since the epoch.
    pub change_time: Option<i64>,
    /// Human-readable change time.
    pub change_time_string: Option<String>,
    /// Owner.
    pub owner: Option<String>,
    /// Owner domain.
    pub domain: Option<String>,
    /// Entry carries an ACL.
    pub has_acl: Option<bool>,
}

impl ListEntry {
    /// Change time as a UTC timestamp.
    pub fn change_time_utc(&self) -> Option<DateTime<Utc>> {
        self.change_time
            .and_then(|t| Utc.timestamp_millis_opt(t).single())
    }

    /// Version create time as a UTC timestamp.
    pub fn version_create_time_utc(&self) -> Option<DateTime<Utc>> {
        self.version_create_time
            .and_then(|t| Utc.timestamp_millis_opt(t).single())
    }

    fn push_fields(&self, row: &mut OutputRow) {
        row.push(attrs::URL_NAME, &self.url_name);
        row.push(attrs::UTF8_NAME, &self.utf8_name);
        row.push(attrs::TYPE, &self.entry_type);
        row.push(attrs::SIZE, self.size);
        row.push(attrs::HASH_SCHEME, &self.hash_scheme);
        row.push(attrs::HASH, &self.hash);
        row.push(attrs::RETENTION, self.retention);
        row.push(attrs::RETENTION_STRING, &self.retention_string);
        row.push(attrs::RETENTION_CLASS, &self.retention_class);
        row.push(attrs::INGEST_TIME, self.ingest_time);
        row.push(attrs::INGEST_TIME_STRING, &self.ingest_time_string);
        row.push(attrs::HOLD, self.hold);
        row.push(attrs::SHRED, self.shred);
        row.push(attrs::DPL, &self.dpl);
        row.push(attrs::INDEX, self.indexed);
        row.push(attrs::CUSTOM_METADATA, self.custom_metadata);
        row.push(attrs::VERSION, &self.version);
        row.push(attrs::STATE, &self.state);
        row.push(attrs::ETAG, &self.etag);
        row.push(attrs::VERSION_CREATE_TIME, self.version_create_time);
        row.push(
            attrs::CUSTOM_METADATA_ANNOTATIONS,
            self.custom_metadata_annotations,
        );
        row.push(attrs::REPLICATED, self.replicated);
        row.push(attrs::CHANGE_TIME, self.change_time);
        row.push(attrs::CHANGE_TIME_STRING, &self.change_time_string);
        row.push(attrs::OWNER, &self.owner);
        row.push(attrs::DOMAIN, &self.domain);
        row.push(attrs::HAS_ACL, self.has_acl);
    }
}

/// Result of a List.
///
/// A listing whose status is not OK never carries entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResponse {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ResponseBase,
    /// Directory-level attributes.
    pub directory: DirectoryAttributes,
    entries: Vec<ListEntry>,
}

impl ListResponse {
    /// Create a response with the given outcome, no metadata and no entries.
    pub fn new(status: Status, explanation: impl Into<String>) -> Self {
        Self::from_base(ResponseBase::new(status, explanation))
    }

    /// Wrap decoded base fields.
    pub fn from_base(base: ResponseBase) -> Self {
        Self {
            base,
            directory: DirectoryAttributes::default(),
            entries: Vec::new(),
        }
    }

    /// Attach a parsed listing. Entries are dropped unless the status is OK.
    pub fn with_listing(mut self, directory: DirectoryAttributes, entries: Vec<ListEntry>) -> Self {
        self.directory = directory;
        if self.base.status() == Status::Ok {
            self.entries = entries;
        }
        self
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Consume the response, yielding the entries in document order.
    pub fn into_entries(self) -> Vec<ListEntry> {
        self.entries
    }
}

impl Response for ListResponse {
    fn base(&self) -> &ResponseBase {
        &self.base
    }

    /// One row per entry. A failed listing yields a single row with the base
    /// and directory fields so the failure can still be routed; a successful
    /// empty listing yields no rows.
    fn output_rows(&self) -> Vec<OutputRow> {
        let prefix = || {
            let mut row = OutputRow::new();
            self.base.push_fields(&mut row);
            self.directory.push_fields(&mut row);
            row
        };

        if !self.base.success() {
            return vec![prefix()];
        }

        self.entries
            .iter()
            .map(|entry| {
                let mut row = prefix();
                entry.push_fields(&mut row);
                row
            })
            .collect()
    }
}

/// Any operation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HcpResponse {
    /// Get result.
    Read(ReadResponse),
    /// List result.
    List(ListResponse),
    /// Create or upsert result.
    Create(CreateResponse),
    /// Delete result.
    Delete(DeleteResponse),
}

impl Response for HcpResponse {
    fn base(&self) -> &ResponseBase {
        match self {
            HcpResponse::Read(r) => r.base(),
            HcpResponse::List(r) => r.base(),
            HcpResponse::Create(r) => r.base(),
            HcpResponse::Delete(r) => r.base(),
        }
    }

    fn output_rows(&self) -> Vec<OutputRow> {
        match self {
            HcpResponse::Read(r) => r.output_rows(),
            HcpResponse::List(r) => r.output_rows(),
            HcpResponse::Create(r) => r.output_rows(),
            HcpResponse::Delete(r) => r.output_rows(),
        }
    }
}

impl From<ReadResponse> for HcpResponse {
    fn from(r: ReadResponse) -> Self {
        HcpResponse::Read(r)
    }
}

impl From<ListResponse> for HcpResponse {
    fn from(r: ListResponse) -> Self {
        HcpResponse::List(r)
    }
}

impl From<CreateResponse> for HcpResponse {
    fn from(r: CreateResponse) -> Self {
        HcpResponse::Create(r)
    }
}

impl From<DeleteResponse> for HcpResponse {
    fn from(r: DeleteResponse) -> Self {
        HcpResponse::Delete(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_status_recomputes_success() {
        let mut base = ResponseBase::new(Status::NotFound, "Not Found");
        assert!(!base.success());

        for status in Status::ALL {
            base.set_status(status, status.as_str());
            assert_eq!(base.success(), status.is_success());
            assert_eq!(base.status(), status);
            assert_eq!(base.explanation(), status.as_str());
        }
    }

    #[test]
    fn test_time_helpers() {
        let mut base = ResponseBase::new(Status::Ok, "OK");
        base.time = Some(1_700_000_000);
        assert_eq!(base.time_utc().unwrap().timestamp(), 1_700_000_000);

        let entry = ListEntry {
            change_time: Some(1_700_000_000_123),
            ..Default::default()
        };
        assert_eq!(
            entry.change_time_utc().unwrap().timestamp_millis(),
            1_700_000_000_123
        );
        assert!(entry.version_create_time_utc().is_none());
    }

    #[test]
    fn test_listing_dropped_unless_ok() {
        let entries = vec![ListEntry::default(), ListEntry::default()];

        let ok = ListResponse::new(Status::Ok, "OK")
            .with_listing(DirectoryAttributes::default(), entries.clone());
        assert_eq!(ok.entries().len(), 2);

        let failed = ListResponse::new(Status::Forbidden, "Forbidden")
            .with_listing(DirectoryAttributes::default(), entries);
        assert!(failed.entries().is_empty());
    }

    #[test]
    fn test_read_output_row_names() {
        let mut read = ReadResponse::new(Status::Ok, "OK");
        read.size = Some(42);
        read.hold = Some(false);

        let rows = read.output_rows();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("Status").unwrap().as_str(), Some("OK"));
        assert_eq!(row.get("X-HCP-Size").unwrap().as_i64(), Some(42));
        assert_eq!(row.get("X-HCP-RetentionHold").unwrap().as_bool(), Some(false));
        assert!(row.get("X-HCP-Owner").unwrap().is_null());
        assert_eq!(row.len(), 8 + 18);
    }

    #[test]
    fn test_create_output_row() {
        let mut create = CreateResponse::new(Status::Created, "Created");
        create.location = Some("/ns/obj".to_string());
        create.cluster_time = Some(UNPARSABLE_CLUSTER_TIME);

        let row = &create.output_rows()[0];
        assert_eq!(row.get("Location").unwrap().as_str(), Some("/ns/obj"));
        assert_eq!(row.get("X-ArcClusterTime").unwrap().as_i64(), Some(-1));
        assert!(row.get("X-ArcHash").unwrap().is_null());
    }

    #[test]
    fn test_list_output_rows() {
        let dir = DirectoryAttributes {
            path: Some("/rest/docs".to_string()),
            ..Default::default()
        };
        let entries = vec![
            ListEntry {
                url_name: Some("a.txt".to_string()),
                ..Default::default()
            },
            ListEntry {
                url_name: Some("b.txt".to_string()),
                ..Default::default()
            },
        ];
        let list = ListResponse::new(Status::Ok, "OK").with_listing(dir.clone(), entries);

        let rows = list.output_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("urlName").unwrap().as_str(), Some("b.txt"));
        assert_eq!(rows[1].get("path").unwrap().as_str(), Some("/rest/docs"));

        let empty = ListResponse::new(Status::Ok, "OK").with_listing(dir, Vec::new());
        assert!(empty.output_rows().is_empty());

        let failed = ListResponse::new(Status::NotFound, "Not Found");
        let rows = failed.output_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Status").unwrap().as_str(), Some("NOT_FOUND"));
        assert!(rows[0].get("urlName").is_none());
    }

    #[test]
    fn test_tagged_union_dispatch() {
        let responses: Vec<HcpResponse> = vec![
            ReadResponse::new(Status::Ok, "OK").into(),
            ListResponse::new(Status::Ok, "OK").into(),
            CreateResponse::failed(Status::Forbidden, "Forbidden").into(),
            DeleteResponse::new(Status::Ok, "OK").into(),
        ];
        let successes: Vec<bool> = responses.iter().map(|r| r.success()).collect();
        assert_eq!(successes, vec![true, true, false, true]);
        assert_eq!(responses[2].explanation(), "Forbidden");
    }

    #[test]
    fn test_serialize_flattens_base() {
        let create = CreateResponse::new(Status::Created, "Created");
        let value = serde_json::to_value(HcpResponse::Create(create)).unwrap();
        assert_eq!(value["kind"], "create");
        assert_eq!(value["status"], "CREATED");
        assert_eq!(value["success"], true);
    }
}
