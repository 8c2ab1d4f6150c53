use log::{debug, error};
use seiscore::store::DocumentStore;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Writes a snapshot every `period` when the store has unsaved changes.
pub fn spawn_autosave(store: Arc<RwLock<DocumentStore>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = save_if_dirty(&store) {
                error!("autosave failed: {:#}", err);
            }
        }
    })
}

pub fn save_if_dirty(store: &RwLock<DocumentStore>) -> anyhow::Result<bool> {
    let mut guard = store
        .write()
        .map_err(|_| anyhow::anyhow!("document store lock poisoned"))?;
    let saved = guard.save_if_dirty()?;
    if saved {
        debug!("autosaved {}", guard.name());
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seiscore::store::{MemoryAdapter, SnapshotAdapter};

    #[tokio::test(start_paused = true)]
    async fn autosave_writes_dirty_store() {
        let memory = MemoryAdapter::new();
        let mut store = DocumentStore::new("auto.db", memory.clone());
        store.init_db().unwrap();
        let store = Arc::new(RwLock::new(store));

        let handle = spawn_autosave(store.clone(), Duration::from_secs(60));
        time::sleep(Duration::from_secs(61)).await;
        handle.abort();

        assert!(memory.load_key("auto.db").unwrap().is_some());
        assert!(!store.read().unwrap().is_dirty());
    }

    #[test]
    fn clean_store_is_not_saved() {
        let memory = MemoryAdapter::new();
        let store = RwLock::new(DocumentStore::new("auto.db", memory.clone()));
        assert!(!save_if_dirty(&store).unwrap());
        assert!(memory.keys().is_empty());
    }
}
