//! Core application

use anyhow::Result;

use crate::core::cli;
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::pipeline;

pub struct RelayApp;

impl RelayApp {
    /// Run the replay with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let cli_config = cli::parse();
        let config = AppConfig::load(&cli_config)?;

        tracing::info!(
            input = %config.input.display(),
            endpoint = %config.export.endpoint,
            dry_run = config.dry_run,
            "Replaying capture"
        );

        let report = pipeline::replay(&config).await?;

        if !report.warnings.is_empty() {
            println!(
                "Warning: {} attribute(s) dropped during reconstruction",
                report.warnings.len()
            );
        }

        if report.spans_read == 0 {
            println!("No spans found in {}", config.input.display());
        } else if config.dry_run {
            println!(
                "Dry run: {} span(s) reconstructed from {}",
                report.spans_read,
                config.input.display()
            );
        } else {
            println!(
                "Exported {} span(s) to {}",
                report.spans_exported, config.export.endpoint
            );
        }

        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}
