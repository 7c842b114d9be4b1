//! Canonical JSON encoding for deterministic signing input.
//!
//! Rules:
//! - The top-level value must be a record
//! - Record keys sorted by raw byte comparison (no case folding, no Unicode
//!   normalization)
//! - List element order preserved exactly
//! - Scalars use their minimal JSON literal
//! - No whitespace between tokens
//!
//! The signature covers these bytes, not the document's wire form. Any change
//! to this encoding breaks every existing proof.

use std::fmt::Write;

use serde::Serialize;

use crate::error::CanonicalError;
use crate::value::{Record, StructuredValue};

/// Bytes produced by [`canonicalize`].
///
/// The inner buffer is private; the only way to obtain one is through the
/// canonicalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// The canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical form as text (always valid UTF-8).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the raw byte vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Canonicalize a record.
///
/// Fails with [`CanonicalError::NotARecord`] for lists and scalars.
pub fn canonicalize(value: &StructuredValue) -> Result<CanonicalBytes, CanonicalError> {
    match value {
        StructuredValue::Record(record) => {
            let mut buf = String::new();
            encode_record(&mut buf, record);
            Ok(CanonicalBytes(buf))
        }
        other => Err(CanonicalError::NotARecord {
            found: other.type_name(),
        }),
    }
}

/// Canonicalize any serializable value whose JSON form is an object.
pub fn canonicalize_serializable<T: Serialize + ?Sized>(
    value: &T,
) -> Result<CanonicalBytes, CanonicalError> {
    let structured = StructuredValue::from_serializable(value)?;
    canonicalize(&structured)
}

/// Recursively encode a value.
fn encode_value_to(buf: &mut String, value: &StructuredValue) {
    match value {
        StructuredValue::String(s) => encode_string(buf, s),
        StructuredValue::Number(n) => {
            // serde_json formats integers verbatim and floats as shortest
            // round-trip text; non-finite numbers cannot be represented.
            let _ = write!(buf, "{n}");
        }
        StructuredValue::Bool(true) => buf.push_str("true"),
        StructuredValue::Bool(false) => buf.push_str("false"),
        StructuredValue::Null => buf.push_str("null"),
        StructuredValue::List(items) => encode_list(buf, items),
        StructuredValue::Record(record) => encode_record(buf, record),
    }
}

/// Encode a list, keeping element order.
fn encode_list(buf: &mut String, items: &[StructuredValue]) {
    buf.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        encode_value_to(buf, item);
    }
    buf.push(']');
}

/// Encode a record with keys sorted by byte comparison.
fn encode_record(buf: &mut String, record: &Record) {
    let mut entries: Vec<(&str, &StructuredValue)> = record.iter().collect();

    // str's Ord is byte-wise lexicographic on the UTF-8 encoding
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    buf.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        encode_string(buf, key);
        buf.push(':');
        encode_value_to(buf, value);
    }
    buf.push('}');
}

/// Encode a JSON string literal with minimal escaping.
fn encode_string(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0c}' => buf.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
}
