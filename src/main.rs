//! Origin Guard for Zentinel
//!
//! Serves a static directory behind the origin classifier.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zentinel_origin_guard::{middleware, OriginGuard, OriginGuardConfig, SignatureConfig};

#[derive(Parser, Debug)]
#[command(name = "zentinel-origin-guard")]
#[command(author, version, about = "Static file server that rejects crawler and bot traffic")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Directory of static files to serve
    #[arg(long, default_value = "public")]
    static_dir: PathBuf,

    /// Path to configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a signatures file (JSON or YAML), replaces the config's signatures
    #[arg(long)]
    signatures: Option<PathBuf>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Unknown levels fall back to `info`.
fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn init_logging(json: bool, level: &str) {
    let env_filter = EnvFilter::from_default_env().add_directive(parse_level(level).into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, &args.log_level);

    let mut config = match &args.config {
        Some(path) => OriginGuardConfig::from_path(path)?,
        None => OriginGuardConfig::default(),
    };

    if let Some(path) = &args.signatures {
        config.signatures = SignatureConfig::from_path(path)?;
        info!(path = %path.display(), "Loaded signatures file");
    }

    let guard = Arc::new(OriginGuard::new(config)?);

    let app = middleware::router(guard, &args.static_dir);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!(
        address = %args.listen,
        static_dir = %args.static_dir.display(),
        "Origin guard listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level(" error "), Level::ERROR);
        assert_eq!(parse_level("verbose"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }
}
