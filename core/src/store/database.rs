use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::prelude::{StoreError, StoreResult};
use crate::telemetry::LogManager;

use super::adapter::{DatabaseSnapshot, SnapshotAdapter};
use super::collection::Collection;

/// Collections every portal database carries.
pub const DEFAULT_COLLECTIONS: [&str; 3] = ["networks", "stations", "channels"];

/// In-memory document store persisted as whole-database snapshots.
///
/// The snapshot is read lazily on first access. Mutable access marks the
/// store dirty until the next successful save.
pub struct DocumentStore {
    name: String,
    collections: BTreeMap<String, Collection>,
    adapter: Box<dyn SnapshotAdapter>,
    loaded: bool,
    dirty: bool,
    logger: LogManager,
}

impl DocumentStore {
    pub fn new<A: SnapshotAdapter + 'static>(name: impl Into<String>, adapter: A) -> Self {
        Self {
            name: name.into(),
            collections: BTreeMap::new(),
            adapter: Box::new(adapter),
            loaded: false,
            dirty: false,
            logger: LogManager::new("store"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Replaces the in-memory state with the adapter's snapshot. Returns
    /// `false` when nothing has been saved yet, leaving the state untouched.
    ///
    /// A failed read leaves the store unloaded, so the next access retries and
    /// nothing is saved over the unread snapshot.
    pub fn load_database(&mut self) -> StoreResult<bool> {
        let snapshot = match self.adapter.load_snapshot(&self.name)? {
            Some(snapshot) => snapshot,
            None => {
                self.loaded = true;
                return Ok(false);
            }
        };
        if snapshot.name != self.name {
            return Err(StoreError::CorruptSnapshot(format!(
                "snapshot belongs to {}, not {}",
                snapshot.name, self.name
            )));
        }
        self.collections = snapshot
            .collections
            .into_iter()
            .map(|c| (c.name().to_string(), c))
            .collect();
        self.loaded = true;
        self.dirty = false;
        self.logger.record(&format!(
            "loaded {} with {} collections",
            self.name,
            self.collections.len()
        ));
        Ok(true)
    }

    fn ensure_loaded(&mut self) -> StoreResult<()> {
        if !self.loaded {
            self.load_database()?;
        }
        Ok(())
    }

    /// Loads the snapshot if needed and makes sure the default collections exist.
    pub fn init_db(&mut self) -> StoreResult<()> {
        self.ensure_loaded()?;
        for name in DEFAULT_COLLECTIONS {
            if !self.collections.contains_key(name) {
                self.add_collection(name);
            }
        }
        Ok(())
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        let collection = self.collections.get_mut(name)?;
        self.dirty = true;
        Some(collection)
    }

    /// Adds an empty collection, replacing any existing one of that name.
    pub fn add_collection(&mut self, name: &str) -> &mut Collection {
        self.dirty = true;
        match self.collections.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(Collection::new(name));
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(Collection::new(name)),
        }
    }

    pub fn remove_collection(&mut self, name: &str) -> bool {
        let removed = self.collections.remove(name).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Returns the named collection, creating it when absent.
    pub fn load_collection(&mut self, name: &str) -> StoreResult<&mut Collection> {
        self.ensure_loaded()?;
        if !self.collections.contains_key(name) {
            self.logger
                .record(&format!("collection {name} does not exist, creating"));
            self.add_collection(name);
        }
        self.dirty = true;
        self.collections
            .get_mut(name)
            .ok_or_else(|| StoreError::MissingCollection(name.to_string()))
    }

    pub fn clear_collection(&mut self, name: &str) -> StoreResult<()> {
        self.load_collection(name)?.clear();
        Ok(())
    }

    /// Drops the collection (documents and id sequence) and adds it back empty.
    pub fn recreate_collection(&mut self, name: &str) -> StoreResult<()> {
        self.ensure_loaded()?;
        self.remove_collection(name);
        self.add_collection(name);
        Ok(())
    }

    pub fn snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            name: self.name.clone(),
            collections: self.collections.values().cloned().collect(),
        }
    }

    /// Fails while the existing snapshot has not been read successfully.
    pub fn save_database(&mut self) -> StoreResult<()> {
        if !self.loaded {
            return Err(StoreError::NotLoaded(self.name.clone()));
        }
        self.adapter.save_snapshot(&self.snapshot())?;
        self.dirty = false;
        self.logger.record(&format!("saved {}", self.name));
        Ok(())
    }

    /// Autosave hook: saves only when something changed. Returns whether a
    /// snapshot was written.
    pub fn save_if_dirty(&mut self) -> StoreResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save_database()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Station;
    use crate::store::{MemoryAdapter, PartitioningAdapter};

    fn station(net: &str, stat: &str) -> Station {
        Station {
            net: net.into(),
            stat: stat.into(),
            ..Default::default()
        }
    }

    #[test]
    fn init_db_creates_default_collections_once() {
        let mut store = DocumentStore::new("portal.db", MemoryAdapter::new());
        store.init_db().unwrap();
        store
            .collection_mut("stations")
            .unwrap()
            .insert(&station("GE", "APE"))
            .unwrap();
        store.init_db().unwrap();
        assert_eq!(store.collection_names(), vec!["channels", "networks", "stations"]);
        assert_eq!(store.collection("stations").unwrap().len(), 1);
    }

    #[test]
    fn load_collection_creates_missing() {
        let mut store = DocumentStore::new("portal.db", MemoryAdapter::new());
        let collection = store.load_collection("events").unwrap();
        assert_eq!(collection.name(), "events");
        assert!(collection.is_empty());
        assert!(store.collection("events").is_some());
    }

    #[test]
    fn clear_keeps_collection_and_recreate_resets_ids() {
        let mut store = DocumentStore::new("portal.db", MemoryAdapter::new());
        store.init_db().unwrap();
        let stations = store.collection_mut("stations").unwrap();
        stations.insert(&station("GE", "APE")).unwrap();
        stations.insert(&station("HL", "ATH")).unwrap();

        store.clear_collection("stations").unwrap();
        let stations = store.collection_mut("stations").unwrap();
        assert!(stations.is_empty());
        assert_eq!(stations.insert(&station("HL", "KTHA")).unwrap(), 3);

        store.recreate_collection("stations").unwrap();
        let stations = store.collection_mut("stations").unwrap();
        assert!(stations.is_empty());
        assert_eq!(stations.insert(&station("HL", "KTHA")).unwrap(), 1);
    }

    #[test]
    fn saved_state_survives_a_new_store() {
        let memory = MemoryAdapter::new();
        let mut store = DocumentStore::new("portal.db", PartitioningAdapter::new(memory.clone()));
        store.init_db().unwrap();
        store
            .collection_mut("stations")
            .unwrap()
            .insert(&station("GE", "APE"))
            .unwrap();
        assert!(store.save_if_dirty().unwrap());
        assert!(!store.save_if_dirty().unwrap());

        let mut reopened = DocumentStore::new("portal.db", PartitioningAdapter::new(memory));
        reopened.init_db().unwrap();
        let stations: Vec<Station> = reopened.collection("stations").unwrap().all().unwrap();
        assert_eq!(stations, vec![station("GE", "APE")]);
        assert!(!reopened.is_dirty());
    }

    #[test]
    fn unreadable_snapshot_is_never_overwritten() {
        let memory = MemoryAdapter::new();
        memory.save_key("portal.db", "{ truncated").unwrap();
        let mut store = DocumentStore::new("portal.db", memory.clone());

        assert!(store.load_collection("stations").is_err());
        assert!(store.load_collection("stations").is_err());
        assert!(store.init_db().is_err());

        store.add_collection("stations");
        assert!(store.is_dirty());
        assert!(matches!(
            store.save_if_dirty(),
            Err(StoreError::NotLoaded(_))
        ));
        assert_eq!(
            memory.load_key("portal.db").unwrap().as_deref(),
            Some("{ truncated")
        );
    }

    #[test]
    fn snapshot_of_another_database_is_rejected() {
        let memory = MemoryAdapter::new();
        let mut other = DocumentStore::new("other.db", memory.clone());
        other.init_db().unwrap();
        other.save_database().unwrap();
        memory
            .save_key("portal.db", &memory.load_key("other.db").unwrap().unwrap())
            .unwrap();

        let mut store = DocumentStore::new("portal.db", memory);
        assert!(matches!(
            store.load_database(),
            Err(StoreError::CorruptSnapshot(_))
        ));
    }
}
