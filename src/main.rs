use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use intel_core::Ruleset;
use intel_server::{AppState, ServerConfig};
use intel_telemetry::{LogFormat, TelemetryConfig};
use tracing::Level;

/// Catalog normalization, capability classification and benchmark matching
/// over HTTP.
#[derive(Debug, Parser)]
#[command(name = "model-intel", version)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "MODEL_INTEL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 picks a free port).
    #[arg(long, env = "MODEL_INTEL_PORT", default_value_t = 9092)]
    port: u16,

    /// JSON file overriding the built-in provider, keyword and matcher tables.
    #[arg(long, env = "MODEL_INTEL_RULES")]
    rules: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "MODEL_INTEL_LOG_LEVEL", default_value = "info")]
    log_level: Level,

    /// Log output format: json or pretty.
    #[arg(long, env = "MODEL_INTEL_LOG_FORMAT", default_value = "json")]
    log_format: LogFormat,

    /// Disable in-memory request metrics.
    #[arg(long)]
    no_metrics: bool,

    /// Maximum accepted request body size in bytes.
    #[arg(long, default_value_t = ServerConfig::default().max_body_bytes)]
    max_body_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let telemetry = intel_telemetry::init_telemetry(TelemetryConfig {
        log_level: args.log_level,
        format: args.log_format,
        metrics_enabled: !args.no_metrics,
        ..Default::default()
    });

    tracing::info!("Starting model-intel server");

    let rules = match &args.rules {
        Some(path) => {
            let rules = Ruleset::from_path(path)
                .with_context(|| format!("loading ruleset from {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                providers = rules.providers.len(),
                "loaded ruleset override"
            );
            rules
        }
        None => Ruleset::default(),
    };

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        max_body_bytes: args.max_body_bytes,
    };
    let state = AppState::new(rules).with_metrics(telemetry.metrics_handle());
    let handle = intel_server::start(config, state)
        .await
        .context("failed to start server")?;

    tracing::info!(port = handle.port, "model-intel server ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;

    tracing::info!("Shutting down");
    handle.abort();
    Ok(())
}
