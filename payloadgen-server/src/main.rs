//! payloadgen server
//!
//! Serves the generic CRUD API over the demo `user`/`product` registry.
//!
//! Usage:
//!   payloadgen-server --port 5854 --config engine.toml

use std::{path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use payloadgen_engine::{CrudService, EngineConfig};
use payloadgen_server::{build_router, demo_registry};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "payloadgen-server")]
#[command(about = "Generic JSON CRUD service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5854")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Path to an engine config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("payloadgen server starting...");
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let registry = demo_registry().context("Failed to build entity registry")?;
    let service = Arc::new(CrudService::new(Arc::new(registry), config));
    let entities: Vec<_> = service.registry().names().map(str::to_string).collect();
    if service.config().strict_keys {
        info!("Strict key checking enabled");
    }

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Serving entities {:?} on http://{}/api/crud", entities, addr);

    axum::serve(listener, build_router(service))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
