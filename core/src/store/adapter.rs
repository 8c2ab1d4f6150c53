use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::debug;
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use crate::prelude::{StoreError, StoreResult};

/// Full database image handed to an adapter on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub name: String,
    pub collections: Vec<Collection>,
}

/// Persistence backend for [`super::DocumentStore`].
///
/// Implementors provide keyed string storage; the default snapshot methods
/// write the whole database as one JSON value under its name.
pub trait SnapshotAdapter: Send + Sync {
    fn load_key(&self, key: &str) -> StoreResult<Option<String>>;
    fn save_key(&self, key: &str, data: &str) -> StoreResult<()>;

    fn load_snapshot(&self, name: &str) -> StoreResult<Option<DatabaseSnapshot>> {
        match self.load_key(name)? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    fn save_snapshot(&self, snapshot: &DatabaseSnapshot) -> StoreResult<()> {
        let data = serde_json::to_string(snapshot)?;
        self.save_key(&snapshot.name, &data)
    }
}

/// Process-local adapter; clones share the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match self.entries.lock() {
            Ok(entries) => entries.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        keys.sort();
        keys
    }
}

fn poisoned() -> StoreError {
    StoreError::CorruptSnapshot("memory adapter lock poisoned".into())
}

impl SnapshotAdapter for MemoryAdapter {
    fn load_key(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn save_key(&self, key: &str, data: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), data.to_string());
        Ok(())
    }
}

/// Writes each key as a file inside `dir`.
#[derive(Debug, Clone)]
pub struct FsAdapter {
    dir: PathBuf,
}

impl FsAdapter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SnapshotAdapter for FsAdapter {
    fn load_key(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save_key(&self, key: &str, data: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        // stage then rename; readers only ever see complete files
        let path = self.path_for(key);
        let staging = self.path_for(&format!("{key}.tmp"));
        fs::write(&staging, data)?;
        fs::rename(staging, path)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PartitionHeader {
    name: String,
    collections: Vec<String>,
}

/// Splits a snapshot into a header (`<name>`) and one partition per
/// collection (`<name>.0`, `<name>.1`, ...) stored through `inner`.
#[derive(Debug, Clone)]
pub struct PartitioningAdapter<A> {
    inner: A,
}

impl<A: SnapshotAdapter> PartitioningAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: SnapshotAdapter> SnapshotAdapter for PartitioningAdapter<A> {
    fn load_key(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.load_key(key)
    }

    fn save_key(&self, key: &str, data: &str) -> StoreResult<()> {
        self.inner.save_key(key, data)
    }

    fn load_snapshot(&self, name: &str) -> StoreResult<Option<DatabaseSnapshot>> {
        let header: PartitionHeader = match self.inner.load_key(name)? {
            Some(data) => serde_json::from_str(&data)?,
            None => return Ok(None),
        };

        let mut collections = Vec::with_capacity(header.collections.len());
        for (index, expected) in header.collections.iter().enumerate() {
            let key = format!("{name}.{index}");
            let data = self.inner.load_key(&key)?.ok_or_else(|| {
                StoreError::CorruptSnapshot(format!("partition {key} is missing"))
            })?;
            let collection: Collection = serde_json::from_str(&data)?;
            if collection.name() != expected {
                return Err(StoreError::CorruptSnapshot(format!(
                    "partition {key} holds {} instead of {expected}",
                    collection.name()
                )));
            }
            collections.push(collection);
        }

        Ok(Some(DatabaseSnapshot {
            name: header.name,
            collections,
        }))
    }

    fn save_snapshot(&self, snapshot: &DatabaseSnapshot) -> StoreResult<()> {
        for (index, collection) in snapshot.collections.iter().enumerate() {
            let key = format!("{}.{index}", snapshot.name);
            self.inner
                .save_key(&key, &serde_json::to_string(collection)?)?;
        }

        // header last: it may only name partitions that are already written
        let header = PartitionHeader {
            name: snapshot.name.clone(),
            collections: snapshot
                .collections
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        };
        self.inner
            .save_key(&snapshot.name, &serde_json::to_string(&header)?)?;
        debug!(
            "saved {} partitions for {}",
            snapshot.collections.len(),
            snapshot.name
        );
        Ok(())
    }
}
