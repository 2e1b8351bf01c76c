//! Field types and value encoding.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::error::{DocTermsError, Result};
use crate::util::bytes::BytesRef;

const SIGN_BIT: u64 = 1 << 63;

/// Turns a readable value into the binary key stored in the index.
///
/// Encoders must be deterministic and order preserving: for two readable
/// values `a < b` under the field's comparison semantics, the encoded keys
/// compare the same way byte-wise.
pub trait ValueEncoder {
    /// Encode a readable value.
    fn readable_to_indexed(&self, readable: &str) -> Result<BytesRef>;

    /// Decode a stored key back into readable form.
    fn indexed_to_readable(&self, indexed: &[u8]) -> String;
}

/// The type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Raw UTF-8 string values.
    String,
    /// 64-bit integers indexed as sortable terms.
    Long,
    /// Boolean values indexed as `T` / `F`.
    Boolean,
    /// 64-bit integers indexed as points.
    LongPoint,
}

impl FieldType {
    /// Get the name of this field type.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Long => "long",
            FieldType::Boolean => "boolean",
            FieldType::LongPoint => "long_point",
        }
    }

    /// Point fields are matched through point values, not terms.
    pub fn is_point_field(&self) -> bool {
        matches!(self, FieldType::LongPoint)
    }

    /// Parse a readable value as a point.
    pub fn parse_point(&self, readable: &str) -> Result<i64> {
        match self {
            FieldType::Long | FieldType::LongPoint => parse_long(readable),
            _ => Err(DocTermsError::bad_request(format!(
                "Field type '{}' does not support point values",
                self.type_name()
            ))),
        }
    }
}

impl ValueEncoder for FieldType {
    fn readable_to_indexed(&self, readable: &str) -> Result<BytesRef> {
        match self {
            FieldType::String => Ok(BytesRef::from(readable)),
            FieldType::Long | FieldType::LongPoint => Ok(encode_long(parse_long(readable)?)),
            FieldType::Boolean => {
                let value = matches!(readable.as_bytes().first(), Some(b'1' | b't' | b'T'));
                Ok(BytesRef::from(if value { "T" } else { "F" }))
            }
        }
    }

    fn indexed_to_readable(&self, indexed: &[u8]) -> String {
        match self {
            FieldType::String => String::from_utf8_lossy(indexed).into_owned(),
            FieldType::Long | FieldType::LongPoint => match decode_long(indexed) {
                Some(value) => value.to_string(),
                None => format!("{indexed:02x?}"),
            },
            FieldType::Boolean => (indexed == b"T").to_string(),
        }
    }
}

fn parse_long(readable: &str) -> Result<i64> {
    readable
        .trim()
        .parse::<i64>()
        .map_err(|e| DocTermsError::bad_request(format!("Invalid Number: {readable} ({e})")))
}

/// Encode an `i64` so that byte order matches numeric order.
pub fn encode_long(value: i64) -> BytesRef {
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, (value as u64) ^ SIGN_BIT);
    BytesRef::new(buf.to_vec())
}

/// Inverse of [`encode_long`].
pub fn decode_long(bytes: &[u8]) -> Option<i64> {
    if bytes.len() != 8 {
        return None;
    }
    Some((BigEndian::read_u64(bytes) ^ SIGN_BIT) as i64)
}

fn default_true() -> bool {
    true
}

/// Definition of a single field in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field has postings (term dictionary).
    #[serde(default = "default_true")]
    pub indexed: bool,

    /// Whether the field has a sorted-set doc-values column.
    #[serde(default = "default_true")]
    pub doc_values: bool,

    /// Whether a document may hold more than one value.
    #[serde(default = "default_true")]
    pub multi_valued: bool,
}

impl FieldDefinition {
    /// Create an indexed, multi-valued field with doc values.
    pub fn new(field_type: FieldType) -> Self {
        FieldDefinition {
            field_type,
            indexed: true,
            doc_values: true,
            multi_valued: true,
        }
    }

    /// Set whether postings are built for this field.
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Set whether doc values are built for this field.
    pub fn doc_values(mut self, doc_values: bool) -> Self {
        self.doc_values = doc_values;
        self
    }

    /// Set whether the field accepts multiple values per document.
    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_encoding_is_identity() {
        let key = FieldType::String.readable_to_indexed("hello").unwrap();
        assert_eq!(key.as_bytes(), b"hello");
        assert_eq!(FieldType::String.indexed_to_readable(key.as_bytes()), "hello");
    }

    #[test]
    fn test_long_encoding_preserves_order() {
        let values = [i64::MIN, -1000, -1, 0, 1, 42, i64::MAX];
        let keys: Vec<BytesRef> = values
            .iter()
            .map(|v| FieldType::Long.readable_to_indexed(&v.to_string()).unwrap())
            .collect();

        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (value, key) in values.iter().zip(&keys) {
            assert_eq!(decode_long(key.as_bytes()), Some(*value));
        }
    }

    #[test]
    fn test_long_encoding_rejects_garbage() {
        let err = FieldType::Long.readable_to_indexed("abc").unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_boolean_encoding() {
        let encode = |s| FieldType::Boolean.readable_to_indexed(s).unwrap();
        assert_eq!(encode("true").as_bytes(), b"T");
        assert_eq!(encode("T").as_bytes(), b"T");
        assert_eq!(encode("1").as_bytes(), b"T");
        assert_eq!(encode("false").as_bytes(), b"F");
        assert_eq!(encode("").as_bytes(), b"F");
    }

    #[test]
    fn test_point_field_flags() {
        assert!(FieldType::LongPoint.is_point_field());
        assert!(!FieldType::Long.is_point_field());
        assert_eq!(FieldType::LongPoint.parse_point(" 7 ").unwrap(), 7);
        assert!(FieldType::String.parse_point("7").is_err());
    }

    #[test]
    fn test_field_definition_defaults_from_json() {
        let def: FieldDefinition = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert_eq!(def, FieldDefinition::new(FieldType::String));

        let def: FieldDefinition =
            serde_json::from_str(r#"{"type": "long_point", "indexed": false}"#).unwrap();
        assert_eq!(def.field_type, FieldType::LongPoint);
        assert!(!def.indexed);
    }
}
