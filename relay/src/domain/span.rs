//! Typed span model
//!
//! The in-memory shape of a reconstructed span: identifiers are validated
//! bytes, timestamps are `DateTime<Utc>`, attributes are typed values.
//! Everything a capture record carries survives here except the raw trace
//! flags and trace state, which stay on the wire model.

use chrono::{DateTime, Utc};

use crate::domain::attr::Attribute;
use crate::domain::id::{SpanId, TraceId};
use crate::domain::resource::Resource;

/// Identity of one span within a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    /// Whether the context was propagated from a remote parent
    pub remote: bool,
}

/// Span kind, mirroring the OTLP numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanKind {
    #[default]
    Unspecified,
    Internal,
    Server,
    Client,
    Producer,
    Consumer,
}

impl SpanKind {
    /// Map the wire integer; out-of-range values fall back to Unspecified
    pub fn from_wire(kind: i32) -> Self {
        match kind {
            1 => SpanKind::Internal,
            2 => SpanKind::Server,
            3 => SpanKind::Client,
            4 => SpanKind::Producer,
            5 => SpanKind::Consumer,
            _ => SpanKind::Unspecified,
        }
    }

    pub fn as_wire(&self) -> i32 {
        match self {
            SpanKind::Unspecified => 0,
            SpanKind::Internal => 1,
            SpanKind::Server => 2,
            SpanKind::Client => 3,
            SpanKind::Producer => 4,
            SpanKind::Consumer => 5,
        }
    }
}

/// Span outcome code
///
/// Capture files spell these as the labels `"Unset"`, `"Error"` and `"Ok"`.
/// The OTLP protocol numbers them differently (Ok = 1, Error = 2); that
/// mapping happens at export conversion, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCode {
    #[default]
    Unset,
    Error,
    Ok,
}

impl StatusCode {
    /// Map a wire label; anything unrecognized falls back to Unset
    pub fn from_label(label: &str) -> Self {
        match label {
            "Error" => StatusCode::Error,
            "Ok" => StatusCode::Ok,
            _ => StatusCode::Unset,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            StatusCode::Unset => "Unset",
            StatusCode::Error => "Error",
            StatusCode::Ok => "Ok",
        }
    }
}

/// Span status with optional description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub code: StatusCode,
    pub description: String,
}

/// Timestamped event recorded on a span
#[derive(Debug, Clone, PartialEq)]
pub struct SpanEvent {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub dropped_attribute_count: u32,
    pub time: DateTime<Utc>,
}

/// Link to another span, possibly in another trace
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLink {
    pub context: SpanContext,
    pub attributes: Vec<Attribute>,
    pub dropped_attribute_count: u32,
}

/// Instrumentation scope that produced a span
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentationScope {
    pub name: String,
    pub version: String,
    pub schema_url: String,
}

/// Fully reconstructed span
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub name: String,
    pub context: SpanContext,
    /// None for root spans
    pub parent: Option<SpanContext>,
    pub kind: SpanKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub attributes: Vec<Attribute>,
    pub events: Vec<SpanEvent>,
    pub links: Vec<SpanLink>,
    pub status: Status,
    pub dropped_attributes: u32,
    pub dropped_events: u32,
    pub dropped_links: u32,
    pub child_span_count: u32,
    pub resource: Resource,
    pub scope: InstrumentationScope,
}

impl Span {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
