//! Game of Life board server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use life::board::BoardManager;
use life::io::file_store::FileStore;
use life::io::memory_store::MemoryStore;
use life::io::store::BoardStore;
use life_server::config::{ServerConfig, load_config};
use life_server::state::AppState;

#[derive(Parser)]
#[command(name = "life-server")]
#[command(about = "HTTP API for stored Game of Life boards")]
struct Args {
    /// Path to the TOML config file (defaults are used if it does not exist)
    #[arg(long, default_value = "life-server.toml")]
    config: PathBuf,

    /// Address to bind the server to
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding board records
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Upper bound for the `state` query parameter
    #[arg(long)]
    max_steps: Option<u64>,

    /// Keep boards in memory instead of on disk
    #[arg(long)]
    in_memory: bool,
}

impl Args {
    /// Load the config file and apply command-line overrides on top of it.
    fn resolve_config(&self) -> Result<ServerConfig> {
        let mut cfg = load_config(&self.config)?;
        if let Some(bind) = &self.bind {
            cfg.bind.clone_from(bind);
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            cfg.data_dir.clone_from(data_dir);
        }
        if let Some(max_steps) = self.max_steps {
            cfg.max_steps = max_steps;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    life::logging::init("life=info,life_server=info,tower_http=info");

    let args = Args::parse();
    let cfg = args.resolve_config()?;

    let store: Arc<dyn BoardStore> = if args.in_memory {
        info!("using in-memory board store");
        Arc::new(MemoryStore::new())
    } else {
        let store = FileStore::open(&cfg.data_dir)
            .with_context(|| format!("open board store {}", cfg.data_dir.display()))?;
        info!(data_dir = %store.root().display(), "board store opened");
        Arc::new(store)
    };

    let state = AppState::new(BoardManager::new(store), cfg.max_steps);
    let app = life_server::app(state);

    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.bind, cfg.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C. If the signal handler cannot be installed, never resolve.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down server");
}
