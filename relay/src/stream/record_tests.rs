//! Tests for the capture wire model

use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::domain::attr::{AttrValue, Attribute};
use crate::domain::id::{SpanId, TraceId};
use crate::domain::resource::Resource;
use crate::domain::span::{
    InstrumentationScope, Span, SpanContext, SpanEvent, SpanKind, SpanLink, Status, StatusCode,
};

use super::*;

// Exactly what the capture writer emits for a server span with one child.
const FULL_RECORD: &str = r#"{
  "Name": "auth.check",
  "SpanContext": {
    "TraceID": "4bf92f3577b34da6a3ce929d0e0e4736",
    "SpanID": "00f067aa0ba902b7",
    "TraceFlags": "01",
    "TraceState": "",
    "Remote": false
  },
  "Parent": {
    "TraceID": "4bf92f3577b34da6a3ce929d0e0e4736",
    "SpanID": "53995c3f42cd8ad8",
    "TraceFlags": "01",
    "TraceState": "",
    "Remote": true
  },
  "SpanKind": 2,
  "StartTime": "2024-05-14T09:00:00.000000001Z",
  "EndTime": "2024-05-14T09:00:00.25Z",
  "Attributes": [
    {"Key": "http.method", "Value": {"Type": "STRING", "Value": "GET"}},
    {"Key": "http.status_code", "Value": {"Type": "INT64", "Value": 200}}
  ],
  "Events": [
    {
      "Name": "cache.miss",
      "Attributes": [{"Key": "cache.key", "Value": {"Type": "STRING", "Value": "user:42"}}],
      "DroppedAttributeCount": 1,
      "Time": "2024-05-14T09:00:00.1Z"
    }
  ],
  "Links": [
    {
      "SpanContext": {
        "TraceID": "0af7651916cd43dd8448eb211c80319c",
        "SpanID": "b7ad6b7169203331",
        "TraceFlags": "00",
        "TraceState": "",
        "Remote": false
      },
      "Attributes": null,
      "DroppedAttributeCount": 0
    }
  ],
  "Status": {"Code": "Ok", "Description": "served"},
  "DroppedAttributes": 3,
  "DroppedEvents": 0,
  "DroppedLinks": 0,
  "ChildSpanCount": 1,
  "Resource": [
    {"Key": "service.name", "Value": {"Type": "STRING", "Value": "checkout"}}
  ],
  "InstrumentationLibrary": {
    "Name": "demo.client",
    "Version": "1.2.0",
    "SchemaURL": "https://opentelemetry.io/schemas/1.24.0"
  }
}"#;

#[test]
fn test_full_record_deserializes() {
    let record: RawSpanRecord = serde_json::from_str(FULL_RECORD).unwrap();

    assert_eq!(record.name, "auth.check");
    assert_eq!(
        record.span_context.trace_id,
        "4bf92f3577b34da6a3ce929d0e0e4736"
    );
    assert_eq!(record.span_context.span_id, "00f067aa0ba902b7");
    assert_eq!(record.span_context.trace_flags, "01");
    assert!(!record.span_context.remote);
    assert_eq!(record.span_kind, 2);
    assert_eq!(
        record.start_time,
        Utc.with_ymd_and_hms(2024, 5, 14, 9, 0, 0).single().unwrap()
            + chrono::Duration::nanoseconds(1)
    );
    assert_eq!(record.attributes.len(), 2);
    assert_eq!(record.attributes[1].value.value_type, "INT64");
    assert_eq!(record.events.len(), 1);
    assert_eq!(record.events[0].dropped_attribute_count, 1);
    assert_eq!(record.links.len(), 1);
    assert!(
        record.links[0].attributes.is_empty(),
        "null link attributes should read as empty"
    );
    assert_eq!(record.status.code, "Ok");
    assert_eq!(record.status.description, "served");
    assert_eq!(record.dropped_attributes, 3);
    assert_eq!(record.child_span_count, 1);
    assert_eq!(record.resource.len(), 1);
    assert_eq!(record.instrumentation_library.name, "demo.client");
    assert_eq!(
        record.instrumentation_library.schema_url,
        "https://opentelemetry.io/schemas/1.24.0"
    );
}

#[test]
fn test_real_parent_is_returned() {
    let record: RawSpanRecord = serde_json::from_str(FULL_RECORD).unwrap();
    let parent = record.parent_context().expect("record has a real parent");
    assert_eq!(parent.span_id, "53995c3f42cd8ad8");
    assert!(parent.remote);
}

#[test]
fn test_zero_parent_means_root() {
    let json = r#"{
      "SpanContext": {"TraceID": "4bf92f3577b34da6a3ce929d0e0e4736", "SpanID": "00f067aa0ba902b7"},
      "Parent": {"TraceID": "00000000000000000000000000000000", "SpanID": "0000000000000000"},
      "StartTime": "2024-05-14T09:00:00Z",
      "EndTime": "2024-05-14T09:00:01Z"
    }"#;
    let record: RawSpanRecord = serde_json::from_str(json).unwrap();
    assert!(record.parent.is_some(), "Parent field itself is present");
    assert!(record.parent_context().is_none(), "zero trace id means no parent");
}

#[test]
fn test_missing_parent_means_root() {
    let json = r#"{
      "SpanContext": {"TraceID": "4bf92f3577b34da6a3ce929d0e0e4736", "SpanID": "00f067aa0ba902b7"},
      "StartTime": "2024-05-14T09:00:00Z",
      "EndTime": "2024-05-14T09:00:01Z"
    }"#;
    let record: RawSpanRecord = serde_json::from_str(json).unwrap();
    assert!(record.parent.is_none());
    assert!(record.parent_context().is_none());
}

#[test]
fn test_minimal_record_defaults() {
    let json = r#"{
      "SpanContext": {"TraceID": "4bf92f3577b34da6a3ce929d0e0e4736", "SpanID": "00f067aa0ba902b7"},
      "StartTime": "2024-05-14T09:00:00Z",
      "EndTime": "2024-05-14T09:00:01Z"
    }"#;
    let record: RawSpanRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.name, "");
    assert_eq!(record.span_kind, 0);
    assert!(record.attributes.is_empty());
    assert!(record.events.is_empty());
    assert!(record.links.is_empty());
    assert_eq!(record.status, RawStatus::default());
    assert_eq!(record.dropped_attributes, 0);
    assert!(record.resource.is_empty());
    assert_eq!(record.instrumentation_library, RawScope::default());
}

#[test]
fn test_null_lists_read_as_empty() {
    let json = r#"{
      "SpanContext": {"TraceID": "4bf92f3577b34da6a3ce929d0e0e4736", "SpanID": "00f067aa0ba902b7"},
      "StartTime": "2024-05-14T09:00:00Z",
      "EndTime": "2024-05-14T09:00:01Z",
      "Attributes": null,
      "Events": null,
      "Links": null,
      "Resource": null
    }"#;
    let record: RawSpanRecord = serde_json::from_str(json).unwrap();
    assert!(record.attributes.is_empty());
    assert!(record.events.is_empty());
    assert!(record.links.is_empty());
    assert!(record.resource.is_empty());
}

#[test]
fn test_attribute_missing_type_reads_as_empty_tag() {
    let json = r#"{
      "SpanContext": {"TraceID": "4bf92f3577b34da6a3ce929d0e0e4736", "SpanID": "00f067aa0ba902b7"},
      "StartTime": "2024-05-14T09:00:00Z",
      "EndTime": "2024-05-14T09:00:01Z",
      "Attributes": [{"Key": "region", "Value": {"Value": "eu-west-1"}}]
    }"#;
    let record: RawSpanRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.attributes.len(), 1);
    assert_eq!(record.attributes[0].value.value_type, "");
    assert_eq!(record.attributes[0].value.value, json!("eu-west-1"));
}

#[test]
fn test_missing_span_context_is_an_error() {
    let json = r#"{"StartTime": "2024-05-14T09:00:00Z", "EndTime": "2024-05-14T09:00:01Z"}"#;
    assert!(serde_json::from_str::<RawSpanRecord>(json).is_err());
}

#[test]
fn test_missing_timestamps_are_an_error() {
    let json = r#"{
      "SpanContext": {"TraceID": "4bf92f3577b34da6a3ce929d0e0e4736", "SpanID": "00f067aa0ba902b7"}
    }"#;
    assert!(serde_json::from_str::<RawSpanRecord>(json).is_err());
}

// ============================================================================
// ENCODING
// ============================================================================

fn sample_span() -> Span {
    let context = SpanContext {
        trace_id: TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
        span_id: SpanId::from_hex("00f067aa0ba902b7").unwrap(),
        remote: false,
    };
    Span {
        name: "auth.check".to_string(),
        context,
        parent: None,
        kind: SpanKind::Server,
        start_time: Utc.with_ymd_and_hms(2024, 5, 14, 9, 0, 0).single().unwrap(),
        end_time: Utc.with_ymd_and_hms(2024, 5, 14, 9, 0, 1).single().unwrap(),
        attributes: vec![Attribute::new("http.method", AttrValue::Str("GET".into()))],
        events: vec![SpanEvent {
            name: "cache.miss".to_string(),
            attributes: vec![],
            dropped_attribute_count: 0,
            time: Utc.with_ymd_and_hms(2024, 5, 14, 9, 0, 0).single().unwrap(),
        }],
        links: vec![SpanLink {
            context: SpanContext {
                trace_id: TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
                span_id: SpanId::from_hex("b7ad6b7169203331").unwrap(),
                remote: true,
            },
            attributes: vec![],
            dropped_attribute_count: 2,
        }],
        status: Status {
            code: StatusCode::Error,
            description: "boom".to_string(),
        },
        dropped_attributes: 0,
        dropped_events: 0,
        dropped_links: 0,
        child_span_count: 0,
        resource: Resource::from_attributes([Attribute::new(
            "service.name",
            AttrValue::Str("checkout".into()),
        )]),
        scope: InstrumentationScope {
            name: "demo.client".to_string(),
            version: "1.2.0".to_string(),
            schema_url: String::new(),
        },
    }
}

#[test]
fn test_from_span_writes_writer_field_names() {
    let record = RawSpanRecord::from_span(&sample_span());
    let value = serde_json::to_value(&record).unwrap();

    let obj = value.as_object().unwrap();
    for key in [
        "Name",
        "SpanContext",
        "Parent",
        "SpanKind",
        "StartTime",
        "EndTime",
        "Attributes",
        "Events",
        "Links",
        "Status",
        "DroppedAttributes",
        "DroppedEvents",
        "DroppedLinks",
        "ChildSpanCount",
        "Resource",
        "InstrumentationLibrary",
    ] {
        assert!(obj.contains_key(key), "missing key {}", key);
    }

    assert_eq!(
        value["SpanContext"]["TraceID"],
        json!("4bf92f3577b34da6a3ce929d0e0e4736")
    );
    assert_eq!(value["SpanContext"]["SpanID"], json!("00f067aa0ba902b7"));
    assert_eq!(value["InstrumentationLibrary"]["SchemaURL"], json!(""));
    assert_eq!(value["Attributes"][0]["Value"]["Type"], json!("STRING"));
}

#[test]
fn test_from_span_root_gets_zero_parent() {
    let record = RawSpanRecord::from_span(&sample_span());
    let parent = record.parent.as_ref().unwrap();
    assert_eq!(parent.trace_id, ZERO_TRACE_ID_HEX);
    assert_eq!(parent.span_id, ZERO_SPAN_ID_HEX);
    assert!(record.parent_context().is_none());
}

#[test]
fn test_from_span_child_keeps_parent() {
    let mut span = sample_span();
    span.parent = Some(SpanContext {
        trace_id: span.context.trace_id,
        span_id: SpanId::from_hex("53995c3f42cd8ad8").unwrap(),
        remote: false,
    });
    let record = RawSpanRecord::from_span(&span);
    let parent = record.parent_context().expect("child keeps its parent");
    assert_eq!(parent.span_id, "53995c3f42cd8ad8");
}

#[test]
fn test_record_round_trip() {
    let record: RawSpanRecord = serde_json::from_str(FULL_RECORD).unwrap();
    let encoded = serde_json::to_string(&record).unwrap();
    let decoded: RawSpanRecord = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_status_label_survives_encoding() {
    let record = RawSpanRecord::from_span(&sample_span());
    assert_eq!(record.status.code, "Error");
    assert_eq!(record.status.description, "boom");
}
