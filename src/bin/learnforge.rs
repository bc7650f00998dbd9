//! Server binary for learnforge.
//!
//! A thin shim over the library crate: parse flags, initialise logging,
//! assemble the state, serve.

use anyhow::{Context, Result};
use clap::Parser;
use learnforge::{AppState, GeminiModel, PdfExtractor, ServiceConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "learnforge", about = "AI tutoring backend — PDF chapters in, learning modules out")]
struct Cli {
    /// Bind address
    #[arg(long, env = "LEARNFORGE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(long, env = "LEARNFORGE_PORT", default_value = "8000")]
    port: u16,

    /// Gemini model id
    #[arg(long, env = "LEARNFORGE_MODEL", default_value = learnforge::config::DEFAULT_MODEL)]
    model: String,

    /// Per-model-call timeout in seconds
    #[arg(long, env = "LEARNFORGE_API_TIMEOUT", default_value = "60")]
    api_timeout: u64,

    /// Log level (overridden by RUST_LOG when set)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut config = ServiceConfig::from_env();
    config.model = cli.model;
    config.api_timeout_secs = cli.api_timeout;

    if config.api_key.is_none() {
        // Deliberately not fatal: the service comes up, generation calls
        // fail with a clear error until the key is provisioned.
        warn!(
            "{} is not set — every model call will fail until it is",
            learnforge::config::API_KEY_ENV
        );
    }
    info!("Using model '{}'", config.model);

    let state = Arc::new(AppState::new(
        Arc::new(GeminiModel::new(config)),
        Arc::new(PdfExtractor),
    ));
    let app = learnforge::router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = Cli::try_parse_from(["learnforge"]).unwrap();
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.model, learnforge::config::DEFAULT_MODEL);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["learnforge", "--port", "9000", "--model", "gemini-2.5-pro"])
            .unwrap();
        assert_eq!(cli.port, 9000);
        assert_eq!(cli.model, "gemini-2.5-pro");
    }

    #[test]
    fn port_env_var_is_honoured() {
        std::env::set_var("LEARNFORGE_PORT", "9100");
        let cli = Cli::try_parse_from(["learnforge"]).unwrap();
        std::env::remove_var("LEARNFORGE_PORT");
        assert_eq!(cli.port, 9100);
    }

    #[test]
    fn flag_beats_env_var() {
        std::env::set_var("LEARNFORGE_HOST", "10.0.0.1");
        let cli = Cli::try_parse_from(["learnforge", "--host", "127.0.0.1"]).unwrap();
        std::env::remove_var("LEARNFORGE_HOST");
        assert_eq!(cli.host, "127.0.0.1");
    }
}
