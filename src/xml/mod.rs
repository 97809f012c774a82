//! XML parsing for HCP directory listings.
//!
//! A listing is a single root element (the directory) whose attributes
//! describe the directory, followed by zero or more `entry` elements, one per
//! object or subdirectory. Entries are decoded in document order with the
//! same tolerant rule as the header decoders.

use crate::error::{HcpError, ResponseError};
use crate::types::{DirectoryAttributes, ListEntry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Attribute names of the listing document, which double as output field
/// names.
pub mod attrs {
    /// Element name of a listing entry.
    pub const ENTRY: &str = "entry";

    /// Directory path.
    pub const PATH: &str = "path";
    /// UTF-8 directory path.
    pub const UTF8_PATH: &str = "utf8Path";
    /// Parent directory.
    pub const PARENT_DIR: &str = "parentDir";
    /// UTF-8 parent directory.
    pub const UTF8_PARENT_DIR: &str = "utf8ParentDir";
    /// Directory deleted flag.
    pub const DIR_DELETED: &str = "dirDeleted";
    /// Show deleted flag.
    pub const SHOW_DELETED: &str = "showDeleted";
    /// Namespace name.
    pub const NAMESPACE_NAME: &str = "namespaceName";
    /// UTF-8 namespace name.
    pub const UTF8_NAMESPACE_NAME: &str = "utf8NamespaceName";

    /// URL-encoded entry name.
    pub const URL_NAME: &str = "urlName";
    /// UTF-8 entry name.
    pub const UTF8_NAME: &str = "utf8Name";
    /// Entry type.
    pub const TYPE: &str = "type";
    /// Size.
    pub const SIZE: &str = "size";
    /// Hash scheme.
    pub const HASH_SCHEME: &str = "hashScheme";
    /// Hash.
    pub const HASH: &str = "hash";
    /// Retention seconds.
    pub const RETENTION: &str = "retention";
    /// Human-readable retention.
    pub const RETENTION_STRING: &str = "retentionString";
    /// Retention class.
    pub const RETENTION_CLASS: &str = "retentionClass";
    /// Ingest time.
    pub const INGEST_TIME: &str = "ingestTime";
    /// Human-readable ingest time.
    pub const INGEST_TIME_STRING: &str = "ingestTimeString";
    /// Hold flag.
    pub const HOLD: &str = "hold";
    /// Shred flag.
    pub const SHRED: &str = "shred";
    /// Data protection level.
    pub const DPL: &str = "dpl";
    /// Index flag.
    pub const INDEX: &str = "index";
    /// Custom metadata flag.
    pub const CUSTOM_METADATA: &str = "customMetadata";
    /// Version label.
    pub const VERSION: &str = "version";
    /// Version state.
    pub const STATE: &str = "state";
    /// Entity tag.
    pub const ETAG: &str = "etag";
    /// Version create time.
    pub const VERSION_CREATE_TIME: &str = "versionCreateTimeMilliseconds";
    /// Custom metadata annotations flag.
    pub const CUSTOM_METADATA_ANNOTATIONS: &str = "customMetadataAnnotations";
    /// Replication flag.
    pub const REPLICATED: &str = "replicated";
    /// Change time.
    pub const CHANGE_TIME: &str = "changeTimeMilliseconds";
    /// Human-readable change time.
    pub const CHANGE_TIME_STRING: &str = "changeTimeString";
    /// Owner.
    pub const OWNER: &str = "owner";
    /// Owner domain.
    pub const DOMAIN: &str = "domain";
    /// ACL flag.
    pub const HAS_ACL: &str = "hasAcl";
}

/// Parsed directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Root element attributes.
    pub directory: DirectoryAttributes,
    /// Entries in document order.
    pub entries: Vec<ListEntry>,
}

fn parse_error(message: impl ToString) -> HcpError {
    HcpError::Response(ResponseError::XmlParseError {
        message: message.to_string(),
    })
}

/// Parse a directory listing body.
///
/// An empty directory yields an empty entry list. A body that is not
/// well-formed XML is a decode error, never an empty listing.
pub fn parse_listing(body: &[u8]) -> Result<Listing, HcpError> {
    let xml = std::str::from_utf8(body).map_err(|e| {
        HcpError::Response(ResponseError::InvalidEncoding {
            message: e.to_string(),
        })
    })?;

    let mut listing = Listing::default();
    walk(xml, |element, depth| {
        if depth == 0 {
            listing.directory = read_directory(element)?;
        } else if element.local_name().as_ref() == attrs::ENTRY.as_bytes() {
            listing.entries.push(read_entry(element)?);
        }
        Ok(())
    })?;
    Ok(listing)
}

/// Check that a document is well-formed XML with a single root element.
pub fn check_well_formed(xml: &str) -> Result<(), HcpError> {
    walk(xml, |_, _| Ok(()))
}

/// Visit every element start in document order with its depth (0 for the
/// root), enforcing well-formedness along the way.
fn walk<F>(xml: &str, mut visit: F) -> Result<(), HcpError>
where
    F: FnMut(&BytesStart<'_>, usize) -> Result<(), HcpError>,
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut root_seen = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    if root_seen {
                        return Err(parse_error("multiple root elements"));
                    }
                    root_seen = true;
                }
                visit(&e, depth)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    if root_seen {
                        return Err(parse_error("multiple root elements"));
                    }
                    root_seen = true;
                }
                visit(&e, depth)?;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(t)) => {
                if depth == 0 && t.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(parse_error("text outside the root element"));
                }
            }
            Ok(Event::CData(_)) if depth == 0 => {
                return Err(parse_error("CDATA outside the root element"));
            }
            Ok(Event::Eof) => {
                if depth != 0 {
                    return Err(parse_error("unexpected end of document: unclosed element"));
                }
                if !root_seen {
                    return Err(parse_error("document has no root element"));
                }
                return Ok(());
            }
            Err(e) => return Err(parse_error(e)),
            _ => {}
        }
    }
}

/// Attribute `(name, value)` pairs of an element, unescaped.
fn attributes(element: &BytesStart<'_>) -> Result<Vec<(String, String)>, HcpError> {
    element
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(parse_error)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(parse_error)?.into_owned();
            Ok((key, value))
        })
        .collect()
}

fn integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn read_directory(element: &BytesStart<'_>) -> Result<DirectoryAttributes, HcpError> {
    let mut dir = DirectoryAttributes::default();
    for (key, value) in attributes(element)? {
        match key.as_str() {
            attrs::PATH => dir.path = Some(value),
            attrs::UTF8_PATH => dir.utf8_path = Some(value),
            attrs::PARENT_DIR => dir.parent_dir = Some(value),
            attrs::UTF8_PARENT_DIR => dir.utf8_parent_dir = Some(value),
            attrs::DIR_DELETED => dir.dir_deleted = Some(flag(&value)),
            attrs::SHOW_DELETED => dir.show_deleted = Some(flag(&value)),
            attrs::NAMESPACE_NAME => dir.namespace_name = Some(value),
            attrs::UTF8_NAMESPACE_NAME => dir.utf8_namespace_name = Some(value),
            _ => {}
        }
    }
    Ok(dir)
}

fn read_entry(element: &BytesStart<'_>) -> Result<ListEntry, HcpError> {
    let mut entry = ListEntry::default();
    for (key, value) in attributes(element)? {
        match key.as_str() {
            attrs::URL_NAME => entry.url_name = Some(value),
            attrs::UTF8_NAME => entry.utf8_name = Some(value),
            attrs::TYPE => entry.entry_type = Some(value),
            attrs::SIZE => entry.size = integer(&value),
            attrs::HASH_SCHEME => entry.hash_scheme = Some(value),
            attrs::HASH => entry.hash = Some(value),
            attrs::RETENTION => entry.retention = integer(&value),
            attrs::RETENTION_STRING => entry.retention_string = Some(value),
            attrs::RETENTION_CLASS => entry.retention_class = Some(value),
            attrs::INGEST_TIME => entry.ingest_time = integer(&value),
            attrs::INGEST_TIME_STRING => entry.ingest_time_string = Some(value),
            attrs::HOLD => entry.hold = Some(flag(&value)),
            attrs::SHRED => entry.shred = Some(flag(&value)),
            attrs::DPL => entry.dpl = Some(value),
            attrs::INDEX => entry.indexed = Some(flag(&value)),
            attrs::CUSTOM_METADATA => entry.custom_metadata = Some(flag(&value)),
            attrs::VERSION => entry.version = Some(value),
            attrs::STATE => entry.state = Some(value),
            attrs::ETAG => entry.etag = Some(value),
            attrs::VERSION_CREATE_TIME => entry.version_create_time = integer(&value),
            attrs::CUSTOM_METADATA_ANNOTATIONS => {
                entry.custom_metadata_annotations = Some(flag(&value))
            }
            attrs::REPLICATED => entry.replicated = Some(flag(&value)),
            attrs::CHANGE_TIME => entry.change_time = integer(&value),
            attrs::CHANGE_TIME_STRING => entry.change_time_string = Some(value),
            attrs::OWNER => entry.owner = Some(value),
            attrs::DOMAIN => entry.domain = Some(value),
            attrs::HAS_ACL => entry.has_acl = Some(flag(&value)),
            _ => {}
        }
    }
    Ok(entry)
}
