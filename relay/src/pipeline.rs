//! Replay Pipeline
//!
//! Orchestrates the one-shot replay of a capture file:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        REPLAY PIPELINE                         │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  ┌─────────┐   ┌─────────────┐   ┌─────────┐   ┌──────────┐    │
//! │  │1. READ  │──▶│2.RECONSTRUCT│──▶│3.CONVERT│──▶│4. EXPORT │    │
//! │  │         │   │             │   │         │   │          │    │
//! │  │ JSON    │   │ Ids, attrs  │   │ OTLP    │   │ One gRPC │    │
//! │  │ stream  │   │ status, res │   │ protos  │   │ call     │    │
//! │  └─────────┘   └─────────────┘   └─────────┘   └──────────┘    │
//! │                                                                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stage Details
//!
//! | Stage          | Input              | Output                       | Module           |
//! |----------------|--------------------|------------------------------|------------------|
//! | 1. Read        | capture file       | `RawSpanRecord` iterator     | `stream/`        |
//! | 2. Reconstruct | `RawSpanRecord`    | `Vec<Span>`                  | `domain/`        |
//! | 3. Convert     | `&[Span]`          | `ExportTraceServiceRequest`  | `export/convert` |
//! | 4. Export      | request            | attempt count or failure     | `export/`        |
//!
//! Reading is strict: the first malformed record fails the run before any
//! network traffic, so a corrupt capture is never partially replayed.
//! Reconstruction collects the whole batch in memory; captures are replay
//! artifacts, not unbounded streams.

use std::io;

use thiserror::Error;

use crate::core::config::AppConfig;
use crate::domain::attr::DecodeWarning;
use crate::domain::reconstruct::{ReconstructError, reconstruct_span};
use crate::domain::span::Span;
use crate::export::{ExportError, OtlpExporter, convert};
use crate::stream::{SpanRecordReader, StreamError};

/// Errors failing a replay run
#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Record {index}: {source}")]
    Reconstruct {
        /// 1-based position of the record in the stream
        index: usize,
        source: ReconstructError,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What a replay run did
#[derive(Debug, Default)]
pub struct RelayReport {
    /// Records decoded from the capture file
    pub spans_read: usize,
    /// Spans handed to the collector (zero under dry run)
    pub spans_exported: usize,
    /// Attempts the export call took (zero when nothing was exported)
    pub export_attempts: u32,
    /// Attributes dropped during reconstruction
    pub warnings: Vec<DecodeWarning>,
}

/// Replay one capture file into the configured collector.
pub async fn replay(config: &AppConfig) -> Result<RelayReport, RelayError> {
    let reader = SpanRecordReader::open(&config.input)?;
    let (spans, warnings) = reconstruct_all(reader)?;

    for warning in &warnings {
        tracing::warn!(%warning, "Dropped attribute during reconstruction");
    }

    let mut report = RelayReport {
        spans_read: spans.len(),
        spans_exported: 0,
        export_attempts: 0,
        warnings,
    };

    if spans.is_empty() {
        tracing::info!(path = %config.input.display(), "Capture file holds no spans, nothing to export");
        return Ok(report);
    }

    if config.dry_run {
        let request = convert::build_export_request(&spans);
        tracing::info!(
            spans = spans.len(),
            resource_groups = request.resource_spans.len(),
            "Dry run, skipping export"
        );
        return Ok(report);
    }

    let exporter = OtlpExporter::connect(&config.export).await?;
    report.export_attempts = exporter.export(&spans).await?;
    report.spans_exported = spans.len();

    tracing::info!(
        spans = report.spans_exported,
        attempts = report.export_attempts,
        endpoint = %config.export.endpoint,
        "Batch exported"
    );

    Ok(report)
}

fn reconstruct_all<R: io::Read>(
    reader: SpanRecordReader<R>,
) -> Result<(Vec<Span>, Vec<DecodeWarning>), RelayError> {
    let mut spans = Vec::new();
    let mut warnings = Vec::new();

    for (index, record) in reader.enumerate() {
        let record = record?;
        let span = reconstruct_span(&record, &mut warnings)
            .map_err(|source| RelayError::Reconstruct {
                index: index + 1,
                source,
            })?;
        spans.push(span);
    }

    Ok((spans, warnings))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
