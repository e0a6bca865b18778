//! Site Meta server - HTTP front end for metadata extraction.

use std::net::SocketAddr;

use axum::http::Request;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::Level;

use site_meta::{AppState, Config, SiteMeta, logging, router};

/// Site Meta - Open Graph / Twitter Card metadata as JSON.
#[derive(Parser, Debug)]
#[command(name = "site-meta-server")]
#[command(about = "HTTP service extracting Open Graph and Twitter Card metadata", long_about = None)]
struct Args {
    /// Address to listen on (overrides the configured bind address).
    #[arg(long, env = "SITE_META_BIND_ADDR")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = args.bind.unwrap_or(config.bind_addr);

    // Initialize tracing from the loaded log settings
    let dispatch = logging::dispatch(&config.log);
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    config.log_summary();

    // Create application state
    let site_meta = SiteMeta::new(config.fetch).with_logger(dispatch);
    let state = AppState::new(site_meta);

    // Build router with middleware
    let app = router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        },
    ));

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting site-meta server");

    axum::serve(listener, app).await?;

    Ok(())
}
