// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "tracerelay";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tracerelay.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TRACERELAY_CONFIG";

// =============================================================================
// Environment Variables - Input
// =============================================================================

/// Environment variable for the capture file path
pub const ENV_INPUT: &str = "TRACERELAY_INPUT";

/// Environment variable for dry-run mode
pub const ENV_DRY_RUN: &str = "TRACERELAY_DRY_RUN";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACERELAY_LOG";

// =============================================================================
// Environment Variables - Export
// =============================================================================

/// Environment variable for the collector endpoint
pub const ENV_ENDPOINT: &str = "TRACERELAY_ENDPOINT";

/// Environment variable for the per-call export timeout in seconds
pub const ENV_EXPORT_TIMEOUT_SECS: &str = "TRACERELAY_EXPORT_TIMEOUT_SECS";

/// Environment variable for the maximum export attempts
pub const ENV_EXPORT_ATTEMPTS: &str = "TRACERELAY_EXPORT_ATTEMPTS";

// =============================================================================
// Export Defaults
// =============================================================================

/// Default OTLP/gRPC collector endpoint (standard OTLP gRPC port)
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4317";

/// Default per-call export timeout in seconds
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 30;

/// Default maximum export attempts
pub const DEFAULT_EXPORT_MAX_ATTEMPTS: u32 = 3;

/// Base delay in milliseconds for export retry backoff
pub const EXPORT_RETRY_BASE_DELAY_MS: u64 = 50;
