//! Conversion from the typed span model to OTLP protobuf
//!
//! Spans are grouped by resource, then by instrumentation scope, in the
//! order each group is first seen, so one capture becomes one
//! `ExportTraceServiceRequest`. Status codes are renumbered here: the
//! capture label order is Unset/Error/Ok while the protocol counts
//! Unset/Ok/Error.

use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;
use opentelemetry_proto::tonic::common::v1::{
    AnyValue, ArrayValue, InstrumentationScope as ProtoScope, KeyValue, any_value,
};
use opentelemetry_proto::tonic::resource::v1::Resource as ProtoResource;
use opentelemetry_proto::tonic::trace::v1::{
    ResourceSpans, ScopeSpans, Span as ProtoSpan, Status as ProtoStatus, span as proto_span,
    status::StatusCode as ProtoStatusCode,
};

use crate::domain::attr::{AttrValue, Attribute};
use crate::domain::resource::Resource;
use crate::domain::span::{InstrumentationScope, Span, SpanEvent, SpanKind, SpanLink, StatusCode};
use crate::utils::time::datetime_to_nanos;

struct ScopeGroup {
    scope: InstrumentationScope,
    spans: Vec<ProtoSpan>,
}

struct ResourceGroup {
    resource: Resource,
    scopes: Vec<ScopeGroup>,
}

/// Build one export request covering the whole batch
pub fn build_export_request(spans: &[Span]) -> ExportTraceServiceRequest {
    let mut groups: Vec<ResourceGroup> = Vec::new();

    for span in spans {
        let group_idx = match groups.iter().position(|g| g.resource == span.resource) {
            Some(idx) => idx,
            None => {
                groups.push(ResourceGroup {
                    resource: span.resource.clone(),
                    scopes: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[group_idx];

        let scope_idx = match group.scopes.iter().position(|s| s.scope == span.scope) {
            Some(idx) => idx,
            None => {
                group.scopes.push(ScopeGroup {
                    scope: span.scope.clone(),
                    spans: Vec::new(),
                });
                group.scopes.len() - 1
            }
        };
        group.scopes[scope_idx].spans.push(span_to_proto(span));
    }

    ExportTraceServiceRequest {
        resource_spans: groups
            .into_iter()
            .map(|group| ResourceSpans {
                resource: Some(resource_to_proto(&group.resource)),
                scope_spans: group
                    .scopes
                    .into_iter()
                    .map(|sg| ScopeSpans {
                        schema_url: sg.scope.schema_url.clone(),
                        scope: Some(scope_to_proto(&sg.scope)),
                        spans: sg.spans,
                    })
                    .collect(),
                schema_url: String::new(),
            })
            .collect(),
    }
}

fn span_to_proto(span: &Span) -> ProtoSpan {
    ProtoSpan {
        trace_id: span.context.trace_id.as_bytes().to_vec(),
        span_id: span.context.span_id.as_bytes().to_vec(),
        parent_span_id: span
            .parent
            .map(|p| p.span_id.as_bytes().to_vec())
            .unwrap_or_default(),
        name: span.name.clone(),
        kind: kind_to_proto(span.kind) as i32,
        start_time_unix_nano: datetime_to_nanos(span.start_time),
        end_time_unix_nano: datetime_to_nanos(span.end_time),
        attributes: attrs_to_proto(&span.attributes),
        dropped_attributes_count: span.dropped_attributes,
        events: span.events.iter().map(event_to_proto).collect(),
        dropped_events_count: span.dropped_events,
        links: span.links.iter().map(link_to_proto).collect(),
        dropped_links_count: span.dropped_links,
        status: Some(ProtoStatus {
            message: span.status.description.clone(),
            code: status_to_proto(span.status.code) as i32,
        }),
        ..Default::default()
    }
}

fn kind_to_proto(kind: SpanKind) -> proto_span::SpanKind {
    match kind {
        SpanKind::Unspecified => proto_span::SpanKind::Unspecified,
        SpanKind::Internal => proto_span::SpanKind::Internal,
        SpanKind::Server => proto_span::SpanKind::Server,
        SpanKind::Client => proto_span::SpanKind::Client,
        SpanKind::Producer => proto_span::SpanKind::Producer,
        SpanKind::Consumer => proto_span::SpanKind::Consumer,
    }
}

fn status_to_proto(code: StatusCode) -> ProtoStatusCode {
    match code {
        StatusCode::Unset => ProtoStatusCode::Unset,
        StatusCode::Ok => ProtoStatusCode::Ok,
        StatusCode::Error => ProtoStatusCode::Error,
    }
}

fn event_to_proto(event: &SpanEvent) -> proto_span::Event {
    proto_span::Event {
        time_unix_nano: datetime_to_nanos(event.time),
        name: event.name.clone(),
        attributes: attrs_to_proto(&event.attributes),
        dropped_attributes_count: event.dropped_attribute_count,
    }
}

fn link_to_proto(link: &SpanLink) -> proto_span::Link {
    proto_span::Link {
        trace_id: link.context.trace_id.as_bytes().to_vec(),
        span_id: link.context.span_id.as_bytes().to_vec(),
        attributes: attrs_to_proto(&link.attributes),
        dropped_attributes_count: link.dropped_attribute_count,
        ..Default::default()
    }
}

fn resource_to_proto(resource: &Resource) -> ProtoResource {
    ProtoResource {
        attributes: resource
            .iter()
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: Some(value_to_proto(value)),
            })
            .collect(),
        ..Default::default()
    }
}

fn scope_to_proto(scope: &InstrumentationScope) -> ProtoScope {
    ProtoScope {
        name: scope.name.clone(),
        version: scope.version.clone(),
        ..Default::default()
    }
}

fn attrs_to_proto(attrs: &[Attribute]) -> Vec<KeyValue> {
    attrs
        .iter()
        .map(|attr| KeyValue {
            key: attr.key.clone(),
            value: Some(value_to_proto(&attr.value)),
        })
        .collect()
}

fn value_to_proto(value: &AttrValue) -> AnyValue {
    let value = match value {
        AttrValue::Bool(v) => any_value::Value::BoolValue(*v),
        AttrValue::Int(v) => any_value::Value::IntValue(*v),
        AttrValue::Float(v) => any_value::Value::DoubleValue(*v),
        AttrValue::Str(v) => any_value::Value::StringValue(v.clone()),
        AttrValue::BoolSlice(vs) => array_value(vs.iter().map(|v| any_value::Value::BoolValue(*v))),
        AttrValue::IntSlice(vs) => array_value(vs.iter().map(|v| any_value::Value::IntValue(*v))),
        AttrValue::FloatSlice(vs) => {
            array_value(vs.iter().map(|v| any_value::Value::DoubleValue(*v)))
        }
        AttrValue::StrSlice(vs) => {
            array_value(vs.iter().map(|v| any_value::Value::StringValue(v.clone())))
        }
    };
    AnyValue { value: Some(value) }
}

fn array_value(values: impl Iterator<Item = any_value::Value>) -> any_value::Value {
    any_value::Value::ArrayValue(ArrayValue {
        values: values.map(|v| AnyValue { value: Some(v) }).collect(),
    })
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
