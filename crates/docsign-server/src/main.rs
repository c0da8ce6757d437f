//! docsign JSON-RPC server
//!
//! # Usage
//!
//! ```bash
//! docsign-server [--config <path>] [--data-dir <path>]
//! ```
//!
//! Without a config file the server keeps everything in memory.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `docsign_server=info`)
//! - `DOCSIGN_CONFIG`, `DOCSIGN_DATA_DIR`: same as the flags

use std::path::PathBuf;

use clap::Parser;
use docsign_core::ServiceConfig;
use docsign_server::DocsignServer;

/// Document signing server speaking JSON-RPC over stdio
#[derive(Parser)]
#[command(name = "docsign-server")]
#[command(about = "Document signing server speaking JSON-RPC over stdio")]
#[command(version)]
struct Args {
    /// Service configuration file (.toml, .json, .yaml)
    #[arg(short, long, env = "DOCSIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Store documents and signatures in this directory
    #[arg(short, long, env = "DOCSIGN_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout is reserved for the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docsign_server=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }

    tracing::info!(config = ?args.config, store = ?config.store, "Starting docsign-server");

    let mut server = DocsignServer::from_config(&config)?;
    server.run().await?;

    Ok(())
}
