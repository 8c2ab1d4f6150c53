//! The session working set: stations picked for display and request building.

use log::debug;
use tokio::sync::broadcast;

use crate::model::{StationEntry, StationKey};
use crate::prelude::WorkingSetError;

const NOTIFY_CAPACITY: usize = 16;

/// Ordered, duplicate-free list of stations plus change notifications.
///
/// Every mutation finishes before subscribers are notified, and each
/// notification carries the full sequence as it stands afterwards.
pub struct WorkingSet {
    entries: Vec<StationEntry>,
    stations_tx: broadcast::Sender<Vec<StationEntry>>,
    focus_tx: broadcast::Sender<StationEntry>,
}

impl WorkingSet {
    pub fn new() -> Self {
        let (stations_tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        let (focus_tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            entries: Vec::new(),
            stations_tx,
            focus_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Vec<StationEntry>> {
        self.stations_tx.subscribe()
    }

    pub fn subscribe_focus(&self) -> broadcast::Receiver<StationEntry> {
        self.focus_tx.subscribe()
    }

    pub fn entries(&self) -> &[StationEntry] {
        &self.entries
    }

    pub fn selected(&self) -> impl Iterator<Item = &StationEntry> {
        self.entries.iter().filter(|entry| entry.selected)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &StationKey) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &StationKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.matches(key))
    }

    /// Appends every entry whose (network, station) pair is not present yet,
    /// including duplicates inside `filtered` itself. Returns how many were added.
    pub fn merge(&mut self, filtered: Vec<StationEntry>) -> usize {
        let before = self.entries.len();
        for entry in filtered {
            if !self.contains(&entry.key()) {
                self.entries.push(entry);
            }
        }
        let added = self.entries.len() - before;
        debug!("working set merge added {} (total {})", added, self.entries.len());
        self.refresh();
        added
    }

    /// Re-publishes the current sequence to subscribers.
    pub fn refresh(&self) {
        // no subscribers is fine
        let _ = self.stations_tx.send(self.entries.clone());
    }

    /// Flips the selected flag and returns its new value.
    pub fn toggle(&mut self, key: &StationKey) -> Result<bool, WorkingSetError> {
        let index = self
            .position(key)
            .ok_or_else(|| WorkingSetError::NotFound(key.clone()))?;
        let entry = &mut self.entries[index];
        entry.selected = !entry.selected;
        let selected = entry.selected;
        self.refresh();
        Ok(selected)
    }

    pub fn remove(&mut self, key: &StationKey) -> Result<StationEntry, WorkingSetError> {
        let index = self
            .position(key)
            .ok_or_else(|| WorkingSetError::NotFound(key.clone()))?;
        let removed = self.entries.remove(index);
        self.refresh();
        Ok(removed)
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.refresh();
    }

    /// Drops every selected entry and returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.selected);
        let removed = before - self.entries.len();
        self.refresh();
        removed
    }

    pub fn invert_all(&mut self) {
        for entry in &mut self.entries {
            entry.selected = !entry.selected;
        }
        self.refresh();
    }

    /// Publishes the entry for `key` on the focus channel.
    pub fn focus(&self, key: &StationKey) -> Result<StationEntry, WorkingSetError> {
        let entry = self
            .position(key)
            .map(|index| self.entries[index].clone())
            .ok_or_else(|| WorkingSetError::NotFound(key.clone()))?;
        let _ = self.focus_tx.send(entry.clone());
        Ok(entry)
    }
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::new()
    }
}
