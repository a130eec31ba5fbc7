//! Span reconstruction
//!
//! Turns one raw capture record into a typed [`Span`]: identifiers are hex
//! decoded, the status label mapped, the resource list merged. Identifier
//! problems fail the record; attribute problems only drop the attribute and
//! leave a warning behind.

use thiserror::Error;

use crate::domain::attr::{DecodeWarning, decode_attributes};
use crate::domain::id::{IdentityError, SpanId, TraceId};
use crate::domain::resource::Resource;
use crate::domain::span::{
    InstrumentationScope, Span, SpanContext, SpanEvent, SpanKind, SpanLink, Status, StatusCode,
};
use crate::stream::record::{RawSpanContext, RawSpanEvent, RawSpanLink, RawSpanRecord};

/// Errors reconstructing a span from a raw record
#[derive(Error, Debug)]
pub enum ReconstructError {
    #[error("cannot decode {role}: {source}")]
    Identity {
        /// Which identifier failed, e.g. "parent trace id"
        role: &'static str,
        source: IdentityError,
    },
}

/// Reconstruct a typed span from a raw record.
///
/// Dropped-attribute warnings accumulate into `warnings`; the record itself
/// only fails when an identifier cannot be decoded.
pub fn reconstruct_span(
    raw: &RawSpanRecord,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<Span, ReconstructError> {
    let context = decode_context(&raw.span_context, "trace id", "span id")?;

    let parent = match raw.parent_context() {
        Some(parent) => Some(decode_context(parent, "parent trace id", "parent span id")?),
        None => None,
    };

    let links = raw
        .links
        .iter()
        .map(|link| decode_link(link, warnings))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Span {
        name: raw.name.clone(),
        context,
        parent,
        kind: SpanKind::from_wire(raw.span_kind),
        start_time: raw.start_time,
        end_time: raw.end_time,
        attributes: decode_attributes(&raw.attributes, warnings),
        events: raw
            .events
            .iter()
            .map(|event| decode_event(event, warnings))
            .collect(),
        links,
        status: Status {
            code: StatusCode::from_label(&raw.status.code),
            description: raw.status.description.clone(),
        },
        dropped_attributes: raw.dropped_attributes,
        dropped_events: raw.dropped_events,
        dropped_links: raw.dropped_links,
        child_span_count: raw.child_span_count,
        resource: Resource::from_entries(&raw.resource, warnings),
        scope: InstrumentationScope {
            name: raw.instrumentation_library.name.clone(),
            version: raw.instrumentation_library.version.clone(),
            schema_url: raw.instrumentation_library.schema_url.clone(),
        },
    })
}

fn decode_context(
    raw: &RawSpanContext,
    trace_role: &'static str,
    span_role: &'static str,
) -> Result<SpanContext, ReconstructError> {
    let trace_id = TraceId::from_hex(&raw.trace_id).map_err(|source| ReconstructError::Identity {
        role: trace_role,
        source,
    })?;
    let span_id = SpanId::from_hex(&raw.span_id).map_err(|source| ReconstructError::Identity {
        role: span_role,
        source,
    })?;
    Ok(SpanContext {
        trace_id,
        span_id,
        remote: raw.remote,
    })
}

fn decode_event(raw: &RawSpanEvent, warnings: &mut Vec<DecodeWarning>) -> SpanEvent {
    SpanEvent {
        name: raw.name.clone(),
        attributes: decode_attributes(&raw.attributes, warnings),
        dropped_attribute_count: raw.dropped_attribute_count,
        time: raw.time,
    }
}

fn decode_link(
    raw: &RawSpanLink,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<SpanLink, ReconstructError> {
    let context = decode_context(&raw.span_context, "link trace id", "link span id")?;
    Ok(SpanLink {
        context,
        attributes: decode_attributes(&raw.attributes, warnings),
        dropped_attribute_count: raw.dropped_attribute_count,
    })
}

#[cfg(test)]
#[path = "reconstruct_tests.rs"]
mod tests;
