//! Wire model for capture files
//!
//! Field names and shapes follow the exporter that wrote the files, so the
//! structs here deserialize its output byte for byte: PascalCase keys,
//! identifiers as hex strings, attribute values tagged with a type name.
//! List fields may arrive as JSON `null` (the writer encodes empty lists
//! that way) and decode to empty vectors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::attr::Attribute;
use crate::domain::span::{Span, SpanContext, SpanEvent, SpanLink};

/// Trace id hex literal marking "no parent" in capture files
pub const ZERO_TRACE_ID_HEX: &str = "00000000000000000000000000000000";

/// Span id hex literal paired with [`ZERO_TRACE_ID_HEX`] when encoding roots
pub const ZERO_SPAN_ID_HEX: &str = "0000000000000000";

/// Tagged attribute value payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttrValue {
    #[serde(rename = "Type", default)]
    pub value_type: String,
    #[serde(rename = "Value", default)]
    pub value: JsonValue,
}

/// Key/value attribute as stored on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawKeyValue {
    #[serde(default)]
    pub key: String,
    pub value: RawAttrValue,
}

/// Span context as stored on the wire
///
/// Trace flags and trace state ride along as raw strings; the reconstructed
/// span does not carry them, only `Remote` survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawSpanContext {
    #[serde(rename = "TraceID")]
    pub trace_id: String,
    #[serde(rename = "SpanID")]
    pub span_id: String,
    pub trace_flags: String,
    pub trace_state: String,
    pub remote: bool,
}

impl RawSpanContext {
    pub fn is_zero_trace(&self) -> bool {
        self.trace_id == ZERO_TRACE_ID_HEX
    }

    pub fn from_context(context: &SpanContext) -> Self {
        Self {
            trace_id: context.trace_id.to_hex(),
            span_id: context.span_id.to_hex(),
            trace_flags: String::new(),
            trace_state: String::new(),
            remote: context.remote,
        }
    }

    /// The all-zero context the writer emits as a root span's parent
    pub fn zero() -> Self {
        Self {
            trace_id: ZERO_TRACE_ID_HEX.to_string(),
            span_id: ZERO_SPAN_ID_HEX.to_string(),
            ..Default::default()
        }
    }
}

/// Span event as stored on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSpanEvent {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<RawKeyValue>,
    #[serde(default)]
    pub dropped_attribute_count: u32,
    pub time: DateTime<Utc>,
}

/// Span link as stored on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSpanLink {
    pub span_context: RawSpanContext,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<RawKeyValue>,
    #[serde(default)]
    pub dropped_attribute_count: u32,
}

/// Span status as stored on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawStatus {
    pub code: String,
    pub description: String,
}

/// Instrumentation scope as stored on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawScope {
    pub name: String,
    pub version: String,
    #[serde(rename = "SchemaURL")]
    pub schema_url: String,
}

/// One span record as stored on the wire
///
/// `SpanContext`, `StartTime` and `EndTime` are required; everything else
/// defaults when absent. A missing `Parent` means the same as the all-zero
/// parent the writer emits for root spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSpanRecord {
    #[serde(default)]
    pub name: String,
    pub span_context: RawSpanContext,
    pub parent: Option<RawSpanContext>,
    #[serde(default)]
    pub span_kind: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Vec<RawKeyValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<RawSpanEvent>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<RawSpanLink>,
    #[serde(default)]
    pub status: RawStatus,
    #[serde(default)]
    pub dropped_attributes: u32,
    #[serde(default)]
    pub dropped_events: u32,
    #[serde(default)]
    pub dropped_links: u32,
    #[serde(default)]
    pub child_span_count: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resource: Vec<RawKeyValue>,
    #[serde(default)]
    pub instrumentation_library: RawScope,
}

impl RawSpanRecord {
    /// Parent context, if the record has a real one.
    ///
    /// Root spans are written with an all-zero parent trace id; a missing
    /// `Parent` field means the same thing. The zero check runs on the raw
    /// hex string, before any identifier decoding.
    pub fn parent_context(&self) -> Option<&RawSpanContext> {
        self.parent.as_ref().filter(|p| !p.is_zero_trace())
    }

    /// Encode a reconstructed span back into wire shape.
    ///
    /// Root spans get the all-zero parent the writer would emit. Trace
    /// flags and trace state are not carried by [`Span`], so they encode
    /// as empty strings.
    pub fn from_span(span: &Span) -> Self {
        Self {
            name: span.name.clone(),
            span_context: RawSpanContext::from_context(&span.context),
            parent: Some(match &span.parent {
                Some(parent) => RawSpanContext::from_context(parent),
                None => RawSpanContext::zero(),
            }),
            span_kind: span.kind.as_wire(),
            start_time: span.start_time,
            end_time: span.end_time,
            attributes: encode_attributes(&span.attributes),
            events: span.events.iter().map(RawSpanEvent::from_event).collect(),
            links: span.links.iter().map(RawSpanLink::from_link).collect(),
            status: RawStatus {
                code: span.status.code.as_label().to_string(),
                description: span.status.description.clone(),
            },
            dropped_attributes: span.dropped_attributes,
            dropped_events: span.dropped_events,
            dropped_links: span.dropped_links,
            child_span_count: span.child_span_count,
            resource: encode_attributes(&span.resource.to_entries()),
            instrumentation_library: RawScope {
                name: span.scope.name.clone(),
                version: span.scope.version.clone(),
                schema_url: span.scope.schema_url.clone(),
            },
        }
    }
}

impl RawSpanEvent {
    pub fn from_event(event: &SpanEvent) -> Self {
        Self {
            name: event.name.clone(),
            attributes: encode_attributes(&event.attributes),
            dropped_attribute_count: event.dropped_attribute_count,
            time: event.time,
        }
    }
}

impl RawSpanLink {
    pub fn from_link(link: &SpanLink) -> Self {
        Self {
            span_context: RawSpanContext::from_context(&link.context),
            attributes: encode_attributes(&link.attributes),
            dropped_attribute_count: link.dropped_attribute_count,
        }
    }
}

/// Encode typed attributes back into tagged wire pairs
pub fn encode_attributes(attrs: &[Attribute]) -> Vec<RawKeyValue> {
    attrs
        .iter()
        .map(|attr| RawKeyValue {
            key: attr.key.clone(),
            value: RawAttrValue {
                value_type: attr.value.type_tag().to_string(),
                value: attr.value.to_wire(),
            },
        })
        .collect()
}

/// The writer encodes empty lists as JSON `null`; read those as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
