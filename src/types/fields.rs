//! Named output fields.
//!
//! A pipeline that drives rows through the operations binds response data by
//! field name. Each response exposes its data as rows of `(name, value)` pairs
//! whose names are the wire names of the underlying header or attribute.

use serde::Serialize;

/// Value of one output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Boolean value.
    Boolean(bool),
    /// The field is unset.
    Null,
}

impl FieldValue {
    /// Returns true if the field is unset.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the text value, if this is a text field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer field.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean field.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&Option<String>> for FieldValue {
    fn from(value: &Option<String>) -> Self {
        value
            .as_ref()
            .map_or(FieldValue::Null, |v| FieldValue::String(v.clone()))
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Integer)
    }
}

impl From<Option<bool>> for FieldValue {
    fn from(value: Option<bool>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Boolean)
    }
}

/// One output row: field names paired with their values, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    fields: Vec<(&'static str, FieldValue)>,
}

impl OutputRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        self.fields.push((name, value.into()));
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Field names in output order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.fields.iter().map(|(n, v)| (*n, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(FieldValue::from(&Some("a".to_string())).as_str(), Some("a"));
        assert!(FieldValue::from(&None::<String>).is_null());
        assert_eq!(FieldValue::from(Some(7i64)).as_i64(), Some(7));
        assert_eq!(FieldValue::from(Some(false)).as_bool(), Some(false));
        assert!(FieldValue::from(None::<bool>).is_null());
    }

    #[test]
    fn test_row_lookup_and_order() {
        let mut row = OutputRow::new();
        row.push("Status", FieldValue::String("OK".to_string()));
        row.push("Content-Length", Some(12i64));
        row.push("X-HCP-Shred", None::<bool>);

        assert_eq!(row.len(), 3);
        assert_eq!(
            row.names().collect::<Vec<_>>(),
            vec!["Status", "Content-Length", "X-HCP-Shred"]
        );
        assert_eq!(row.get("Content-Length"), Some(&FieldValue::Integer(12)));
        assert!(row.get("X-HCP-Shred").unwrap().is_null());
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_serializes_untagged() {
        let values = vec![
            FieldValue::String("x".to_string()),
            FieldValue::Integer(3),
            FieldValue::Boolean(true),
            FieldValue::Null,
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"["x",3,true,null]"#
        );
    }
}
