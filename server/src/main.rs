use anyhow::Context;
use api::Catalog;
use clap::Parser;
use config::ServerConfig;
use log::{error, info};
use persistence::autosave::{save_if_dirty, spawn_autosave};
use persistence::seed::{apply_seed, SeedData};
use seiscore::store::DocumentStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod api;
mod config;
mod persistence;

#[derive(Parser)]
#[command(author, version, about = "Seismic portal catalog service")]
struct Args {
    /// Load the service config from YAML; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    #[arg(long)]
    db_name: Option<String>,
    /// Persist snapshots as files in this directory instead of memory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
    #[arg(long)]
    autosave_secs: Option<u64>,
    /// JSON inventory dump (networks, stations, channels) loaded at startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(db_name) = self.db_name {
            config.db_name = db_name;
        }
        if self.snapshot_dir.is_some() {
            config.snapshot_dir = self.snapshot_dir;
        }
        if let Some(secs) = self.autosave_secs {
            config.autosave_secs = secs;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Args::parse().into_config()?;

    let mut store = persistence::open_store(&config)?;
    if let Some(path) = config.seed.as_ref() {
        let seed = SeedData::load(path)?;
        apply_seed(&mut store, &seed)?;
    }
    let store = Arc::new(RwLock::new(store));

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("building service runtime")?;
    runtime.block_on(serve(config, store))
}

async fn serve(config: ServerConfig, store: Arc<RwLock<DocumentStore>>) -> anyhow::Result<()> {
    let autosave = spawn_autosave(store.clone(), config.autosave_interval());
    let routes = api::routes(Catalog::new(store.clone()));

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(config.bind, async {
            if let Err(err) = signal::ctrl_c().await {
                error!("awaiting Ctrl+C failed: {}", err);
            }
        })
        .with_context(|| format!("binding {}", config.bind))?;
    info!("portal service listening on http://{}", addr);
    server.await;

    autosave.abort();
    save_if_dirty(&store).context("final snapshot")?;
    info!("portal service stopped");
    Ok(())
}
