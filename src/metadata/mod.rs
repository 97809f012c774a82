//! Header metadata decoders.
//!
//! Pure functions that fill response fields from an HTTP header map. Decoding
//! is tolerant: an absent header leaves its field unset, and a header that does
//! not parse as its target type is also left unset. One malformed header never
//! affects the others.
//!
//! Lookup uses [`http::HeaderMap`], so header names match case-insensitively.
//! When a header repeats, only its first value is used.

use crate::types::{
    CreateResponse, ReadResponse, ResponseBase, UNKNOWN_ARC_HASH, UNPARSABLE_CLUSTER_TIME,
};
use http::HeaderMap;

/// Header names consumed from store responses, which double as output field
/// names.
pub mod headers {
    /// Output field carrying the status wire name.
    pub const STATUS_FIELD: &str = "Status";
    /// Server time.
    pub const X_HCP_TIME: &str = "X-HCP-Time";
    /// Server identity.
    pub const SERVER: &str = "Server";
    /// Content hash.
    pub const X_HCP_HASH: &str = "X-HCP-Hash";
    /// Servicing system.
    pub const X_HCP_SERVICED_BY_SYSTEM: &str = "X-HCP-ServicedBySystem";
    /// Request identifier.
    pub const X_REQUEST_ID: &str = "X-RequestId";
    /// Content type.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Content length.
    pub const CONTENT_LENGTH: &str = "Content-Length";

    /// Object MIME type.
    pub const X_HCP_TYPE: &str = "X-HCP-Type";
    /// Object size.
    pub const X_HCP_SIZE: &str = "X-HCP-Size";
    /// Version identifier.
    pub const X_HCP_VERSION_ID: &str = "X-HCP-VersionId";
    /// Ingest time.
    pub const X_HCP_INGEST_TIME: &str = "X-HCP-IngestTime";
    /// Retention class.
    pub const X_HCP_RETENTION_CLASS: &str = "X-HCP-RetentionClass";
    /// Human-readable retention.
    pub const X_HCP_RETENTION_STRING: &str = "X-HCP-RetentionString";
    /// Retention seconds.
    pub const X_HCP_RETENTION: &str = "X-HCP-Retention";
    /// Hold flag.
    pub const X_HCP_RETENTION_HOLD: &str = "X-HCP-RetentionHold";
    /// Shred flag.
    pub const X_HCP_SHRED: &str = "X-HCP-Shred";
    /// Data protection level.
    pub const X_HCP_DPL: &str = "X-HCP-DPL";
    /// Index flag.
    pub const X_HCP_INDEX: &str = "X-HCP-Index";
    /// Custom metadata flag.
    pub const X_HCP_CUSTOM_METADATA: &str = "X-HCP-Custom-Metadata";
    /// Custom metadata annotations.
    pub const X_HCP_CUSTOM_METADATA_ANNOTATIONS: &str = "X-HCP-CustomMetadataAnnotations";
    /// Owner.
    pub const X_HCP_OWNER: &str = "X-HCP-Owner";
    /// Owner domain.
    pub const X_HCP_DOMAIN: &str = "X-HCP-Domain";
    /// Replication flag.
    pub const X_HCP_REPLICATED: &str = "X-HCP-Replicated";
    /// Replication collision flag.
    pub const X_HCP_REPLICATION_COLLISION: &str = "X-HCP-ReplicationCollision";
    /// Human-readable change time.
    pub const X_HCP_CHANGE_TIME_STRING: &str = "X-HCP-ChangeTimeString";

    /// Resulting object URL.
    pub const LOCATION: &str = "Location";
    /// Compound `<scheme> <hash>` header.
    pub const X_ARC_HASH: &str = "X-ArcHash";
    /// Cluster time.
    pub const X_ARC_CLUSTER_TIME: &str = "X-ArcClusterTime";
}

/// First value of a header, if present and visible ASCII.
pub fn first_value<'a>(map: &'a HeaderMap, name: &str) -> Option<&'a str> {
    map.get(name).and_then(|v| v.to_str().ok())
}

fn text(map: &HeaderMap, name: &str) -> Option<String> {
    first_value(map, name).map(str::to_string)
}

fn integer(map: &HeaderMap, name: &str) -> Option<i64> {
    first_value(map, name).and_then(|v| v.trim().parse().ok())
}

fn flag(map: &HeaderMap, name: &str) -> Option<bool> {
    first_value(map, name).map(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Decode the fields every response carries.
pub fn populate_minimum_metadata(mut base: ResponseBase, map: &HeaderMap) -> ResponseBase {
    base.time = integer(map, headers::X_HCP_TIME);
    base.server = text(map, headers::SERVER);
    base.hash = text(map, headers::X_HCP_HASH);
    base.serviced_by = text(map, headers::X_HCP_SERVICED_BY_SYSTEM);
    base.request_id = text(map, headers::X_REQUEST_ID);
    base.content_type = text(map, headers::CONTENT_TYPE);
    base.content_length = integer(map, headers::CONTENT_LENGTH);
    base
}

/// Decode object-level system metadata.
pub fn populate_read_metadata(mut read: ReadResponse, map: &HeaderMap) -> ReadResponse {
    read.object_type = text(map, headers::X_HCP_TYPE);
    read.size = integer(map, headers::X_HCP_SIZE);
    read.version_id = text(map, headers::X_HCP_VERSION_ID);
    read.ingest_time = integer(map, headers::X_HCP_INGEST_TIME);
    read.retention_class = text(map, headers::X_HCP_RETENTION_CLASS);
    read.retention_string = text(map, headers::X_HCP_RETENTION_STRING);
    read.retention = integer(map, headers::X_HCP_RETENTION);
    read.hold = flag(map, headers::X_HCP_RETENTION_HOLD);
    read.shred = flag(map, headers::X_HCP_SHRED);
    read.dpl = integer(map, headers::X_HCP_DPL);
    read.indexed = flag(map, headers::X_HCP_INDEX);
    read.custom_metadata = flag(map, headers::X_HCP_CUSTOM_METADATA);
    read.custom_metadata_annotations = text(map, headers::X_HCP_CUSTOM_METADATA_ANNOTATIONS);
    read.owner = text(map, headers::X_HCP_OWNER);
    read.domain = text(map, headers::X_HCP_DOMAIN);
    read.replicated = flag(map, headers::X_HCP_REPLICATED);
    read.replication_collision = flag(map, headers::X_HCP_REPLICATION_COLLISION);
    read.change_time_string = text(map, headers::X_HCP_CHANGE_TIME_STRING);
    read
}

/// Decode the fields a create (or metadata update) reports.
///
/// Two sentinels are kept for downstream consumers: an arc hash header
/// without both a scheme and a value yields [`UNKNOWN_ARC_HASH`], and a
/// non-numeric cluster time yields [`UNPARSABLE_CLUSTER_TIME`]. Absent
/// headers leave their fields unset.
pub fn populate_create_metadata(mut create: CreateResponse, map: &HeaderMap) -> CreateResponse {
    create.location = text(map, headers::LOCATION);
    create.arc_hash = first_value(map, headers::X_ARC_HASH).map(|value| {
        let mut tokens = value.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(_scheme), Some(hash)) => hash.to_string(),
            _ => UNKNOWN_ARC_HASH.to_string(),
        }
    });
    create.cluster_time = first_value(map, headers::X_ARC_CLUSTER_TIME)
        .map(|v| v.trim().parse().unwrap_or(UNPARSABLE_CLUSTER_TIME));
    create.version_id = text(map, headers::X_HCP_VERSION_ID);
    create
}
