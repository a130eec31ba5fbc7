//! Attribute decoding
//!
//! Capture files tag every attribute value with the exporter's type name
//! (`STRING`, `INT64`, ...) and store the payload as plain JSON. Decoding
//! turns each tagged pair back into a typed value. Attributes that cannot
//! be decoded are dropped with a warning instead of failing the record.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::stream::record::RawKeyValue;

/// Typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    BoolSlice(Vec<bool>),
    Int(i64),
    IntSlice(Vec<i64>),
    Float(f64),
    FloatSlice(Vec<f64>),
    Str(String),
    StrSlice(Vec<String>),
}

impl AttrValue {
    /// Wire type tag used by capture files for this variant
    pub fn type_tag(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "BOOL",
            AttrValue::BoolSlice(_) => "BOOLSLICE",
            AttrValue::Int(_) => "INT64",
            AttrValue::IntSlice(_) => "INT64SLICE",
            AttrValue::Float(_) => "FLOAT64",
            AttrValue::FloatSlice(_) => "FLOAT64SLICE",
            AttrValue::Str(_) => "STRING",
            AttrValue::StrSlice(_) => "STRINGSLICE",
        }
    }

    /// JSON payload used by capture files for this value
    pub fn to_wire(&self) -> JsonValue {
        match self {
            AttrValue::Bool(v) => JsonValue::from(*v),
            AttrValue::BoolSlice(v) => JsonValue::from(v.clone()),
            AttrValue::Int(v) => JsonValue::from(*v),
            AttrValue::IntSlice(v) => JsonValue::from(v.clone()),
            AttrValue::Float(v) => JsonValue::from(*v),
            AttrValue::FloatSlice(v) => JsonValue::from(v.clone()),
            AttrValue::Str(v) => JsonValue::from(v.clone()),
            AttrValue::StrSlice(v) => JsonValue::from(v.clone()),
        }
    }
}

/// Decoded key/value attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Non-fatal problem found while decoding a record
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeWarning {
    /// Attribute carried a type tag this decoder does not know
    UnknownAttributeType { key: String, type_tag: String },
    /// Attribute payload did not match its type tag
    MismatchedAttributeValue { key: String, type_tag: String },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::UnknownAttributeType { key, type_tag } => {
                write!(f, "attribute '{}' has unknown type tag '{}'", key, type_tag)
            }
            DecodeWarning::MismatchedAttributeValue { key, type_tag } => {
                write!(
                    f,
                    "attribute '{}' has a value that does not match type tag '{}'",
                    key, type_tag
                )
            }
        }
    }
}

/// Decode a single tagged attribute.
///
/// Returns `None` and pushes a warning when the type tag is unknown or the
/// payload does not match it.
pub fn decode_attribute(raw: &RawKeyValue, warnings: &mut Vec<DecodeWarning>) -> Option<Attribute> {
    let decoded = match raw.value.value_type.as_str() {
        "BOOL" => raw.value.value.as_bool().map(AttrValue::Bool),
        "BOOLSLICE" => decode_slice(&raw.value.value).map(AttrValue::BoolSlice),
        "INT64" => decode_int64(&raw.value.value),
        "INT64SLICE" => decode_slice(&raw.value.value).map(AttrValue::IntSlice),
        "FLOAT64" => raw.value.value.as_f64().map(AttrValue::Float),
        "FLOAT64SLICE" => decode_slice(&raw.value.value).map(AttrValue::FloatSlice),
        "STRING" => raw
            .value
            .value
            .as_str()
            .map(|s| AttrValue::Str(s.to_string())),
        "STRINGSLICE" => decode_slice(&raw.value.value).map(AttrValue::StrSlice),
        _ => {
            warnings.push(DecodeWarning::UnknownAttributeType {
                key: raw.key.clone(),
                type_tag: raw.value.value_type.clone(),
            });
            return None;
        }
    };

    match decoded {
        Some(value) => Some(Attribute {
            key: raw.key.clone(),
            value,
        }),
        None => {
            warnings.push(DecodeWarning::MismatchedAttributeValue {
                key: raw.key.clone(),
                type_tag: raw.value.value_type.clone(),
            });
            None
        }
    }
}

/// Decode a list of tagged attributes, preserving order and skipping
/// the ones that fail.
pub fn decode_attributes(raw: &[RawKeyValue], warnings: &mut Vec<DecodeWarning>) -> Vec<Attribute> {
    raw.iter()
        .filter_map(|kv| decode_attribute(kv, warnings))
        .collect()
}

/// Integer payloads come back float-typed (`125.0`) when the capture went
/// through a JSON round trip that lost the integer encoding. Truncate to
/// the integer part in that case.
fn decode_int64(value: &JsonValue) -> Option<AttrValue> {
    if let Some(i) = value.as_i64() {
        return Some(AttrValue::Int(i));
    }
    value.as_f64().map(|f| AttrValue::Int(f as i64))
}

fn decode_slice<T>(value: &JsonValue) -> Option<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
#[path = "attr_tests.rs"]
mod tests;
