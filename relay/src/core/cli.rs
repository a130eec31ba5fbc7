use clap::Parser;

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DRY_RUN, ENV_ENDPOINT, ENV_EXPORT_ATTEMPTS, ENV_EXPORT_TIMEOUT_SECS, ENV_INPUT,
};

#[derive(Parser)]
#[command(name = "tracerelay")]
#[command(version, about = "Replay captured trace files into an OTLP collector", long_about = None)]
pub struct Cli {
    /// Path to the capture file to replay
    #[arg(long, short = 'i', env = ENV_INPUT)]
    pub input: Option<PathBuf>,

    /// OTLP/gRPC endpoint of the target collector
    #[arg(long, short = 'e', env = ENV_ENDPOINT)]
    pub endpoint: Option<String>,

    /// Per-call export timeout in seconds
    #[arg(long, env = ENV_EXPORT_TIMEOUT_SECS)]
    pub export_timeout_secs: Option<u64>,

    /// Maximum export attempts before giving up
    #[arg(long, env = ENV_EXPORT_ATTEMPTS)]
    pub export_attempts: Option<u32>,

    /// Reconstruct and convert the capture without contacting the collector
    #[arg(long, env = ENV_DRY_RUN)]
    pub dry_run: bool,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub input: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub export_timeout_secs: Option<u64>,
    pub export_attempts: Option<u32>,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
}

/// Parse CLI arguments
pub fn parse() -> CliConfig {
    let cli = Cli::parse();
    CliConfig {
        input: cli.input,
        endpoint: cli.endpoint,
        export_timeout_secs: cli.export_timeout_secs,
        export_attempts: cli.export_attempts,
        dry_run: cli.dry_run,
        config: cli.config,
    }
}
