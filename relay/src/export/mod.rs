//! Batch export to an OTLP collector
//!
//! One gRPC channel, one `Export` call per replay. The call is retried
//! with exponential backoff on transport errors; a response whose partial
//! success reports rejected spans fails the run, because a replay that
//! silently loses spans has not replayed the capture.

pub mod convert;

use opentelemetry_proto::tonic::collector::trace::v1::trace_service_client::TraceServiceClient;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};

use crate::core::config::ExportConfig;
use crate::core::constants::EXPORT_RETRY_BASE_DELAY_MS;
use crate::domain::span::Span;
use crate::utils::retry::retry_with_backoff;

/// Errors talking to the collector
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid collector endpoint {endpoint}: {source}")]
    Endpoint {
        endpoint: String,
        source: tonic::transport::Error,
    },

    #[error("Cannot connect to collector {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: tonic::transport::Error,
    },

    #[error("Export call failed after {attempts} attempt(s): {source}")]
    Call {
        attempts: u32,
        source: tonic::Status,
    },

    #[error("Collector rejected {rejected} span(s): {message}")]
    Rejected { rejected: i64, message: String },
}

/// OTLP/gRPC span exporter
pub struct OtlpExporter {
    client: TraceServiceClient<Channel>,
    max_attempts: u32,
}

impl OtlpExporter {
    /// Connect to the collector with the configured timeouts.
    ///
    /// The connection is established eagerly so an unreachable collector
    /// fails here, before any spans are handed over.
    pub async fn connect(config: &ExportConfig) -> Result<Self, ExportError> {
        let endpoint = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|source| ExportError::Endpoint {
                endpoint: config.endpoint.clone(),
                source,
            })?
            .connect_timeout(config.timeout)
            .timeout(config.timeout);

        let channel = endpoint
            .connect()
            .await
            .map_err(|source| ExportError::Connect {
                endpoint: config.endpoint.clone(),
                source,
            })?;

        tracing::debug!(endpoint = %config.endpoint, "Connected to collector");

        Ok(Self {
            client: TraceServiceClient::new(channel),
            max_attempts: config.max_attempts,
        })
    }

    /// Export the whole batch in a single call, retrying transient failures.
    ///
    /// Returns the number of attempts the successful call took.
    pub async fn export(&self, spans: &[Span]) -> Result<u32, ExportError> {
        let request = convert::build_export_request(spans);

        let (response, attempts) =
            retry_with_backoff(self.max_attempts, EXPORT_RETRY_BASE_DELAY_MS, || {
                let mut client = self.client.clone();
                let request = request.clone();
                async move { client.export(request).await }
            })
            .await
            .map_err(|(source, attempts)| ExportError::Call { attempts, source })?;

        if attempts > 1 {
            tracing::debug!(attempts, "Export succeeded after retry");
        }

        if let Some(partial) = response.into_inner().partial_success
            && partial.rejected_spans > 0
        {
            return Err(ExportError::Rejected {
                rejected: partial.rejected_spans,
                message: partial.error_message,
            });
        }

        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_error_display() {
        let err = ExportError::Call {
            attempts: 3,
            source: tonic::Status::unavailable("collector down"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Export call failed after 3 attempt(s):"));
        assert!(msg.contains("collector down"));
    }

    #[test]
    fn test_rejected_error_display() {
        let err = ExportError::Rejected {
            rejected: 5,
            message: "queue full".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Collector rejected 5 span(s): queue full"
        );
    }
}
