//! Time utility functions

use chrono::{DateTime, Utc};

/// Convert DateTime<Utc> to nanoseconds since Unix epoch
///
/// Timestamps before the epoch or outside the i64 nanosecond range clamp to
/// zero. Capture files use the year-1 zero time for spans that never ended.
pub fn datetime_to_nanos(dt: DateTime<Utc>) -> u64 {
    match dt.timestamp_nanos_opt() {
        Some(nanos) if nanos >= 0 => nanos as u64,
        _ => {
            tracing::warn!(timestamp = %dt, "Timestamp outside exportable range, using epoch");
            0
        }
    }
}
