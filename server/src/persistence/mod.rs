pub mod autosave;
pub mod seed;

use crate::config::ServerConfig;
use anyhow::Context;
use log::info;
use seiscore::store::{DocumentStore, FsAdapter, MemoryAdapter, PartitioningAdapter};

/// Opens the configured store, loads any snapshot and creates the default
/// collections.
pub fn open_store(config: &ServerConfig) -> anyhow::Result<DocumentStore> {
    let mut store = match config.snapshot_dir.as_ref() {
        Some(dir) => {
            info!("persisting snapshots under {}", dir.display());
            DocumentStore::new(config.db_name.clone(), FsAdapter::new(dir))
        }
        None => {
            info!("persisting snapshots in memory partitions");
            DocumentStore::new(
                config.db_name.clone(),
                PartitioningAdapter::new(MemoryAdapter::new()),
            )
        }
    };
    store
        .init_db()
        .with_context(|| format!("initializing document store {}", config.db_name))?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backed_store_reopens_saved_collections() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            snapshot_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let mut store = open_store(&config).unwrap();
        store.load_collection("events").unwrap();
        store.save_database().unwrap();

        let reopened = open_store(&config).unwrap();
        assert_eq!(
            reopened.collection_names(),
            vec!["channels", "events", "networks", "stations"]
        );
    }
}
