//! attrcheck-api - Attribute optimization check service
//!
//! Reconciles product-attribute optimization records POSTed by an upstream
//! workflow and converts uploaded CSV/XLSX tables into the same flat-record
//! JSON shape.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use attrcheck_api::build_router;
use attrcheck_common::config::resolve_listen_config;

/// Command-line arguments (each may also come from the environment)
#[derive(Debug, Parser)]
#[command(name = "attrcheck-api", about = "Attribute optimization check service")]
struct Args {
    /// Listen host
    #[arg(long, env = "ATTRCHECK_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(long, env = "ATTRCHECK_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting attrcheck-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = resolve_listen_config(args.host.as_deref(), args.port);
    let addr = config.socket_addr()?;

    let app = build_router();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("attrcheck-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
