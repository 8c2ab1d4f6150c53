use anyhow::Context;
use log::info;
use seiscore::model::{FdsnChannel, FdsnNetwork, Station};
use seiscore::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inventory dump used to (re)populate the store at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub networks: Vec<FdsnNetwork>,
    pub stations: Vec<Station>,
    pub channels: Vec<FdsnChannel>,
}

impl SeedData {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading seed file {}", path_ref.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing seed file {}", path_ref.display()))
    }

    /// Stations listed at top level, or else the ones nested under networks.
    fn flat_stations(&self) -> Vec<Station> {
        if !self.stations.is_empty() {
            return self.stations.clone();
        }
        self.networks
            .iter()
            .flat_map(|network| network.stations.iter().cloned())
            .collect()
    }
}

/// Recreates every collection the seed provides data for and fills it.
/// Collections the seed leaves empty keep their current content.
pub fn apply_seed(store: &mut DocumentStore, seed: &SeedData) -> anyhow::Result<()> {
    let networks: Vec<FdsnNetwork> = seed
        .networks
        .iter()
        .map(FdsnNetwork::without_stations)
        .collect();
    let stations = seed.flat_stations();

    replace(store, "networks", &networks)?;
    replace(store, "stations", &stations)?;
    replace(store, "channels", &seed.channels)?;
    Ok(())
}

fn replace<T: Serialize>(store: &mut DocumentStore, name: &str, documents: &[T]) -> anyhow::Result<()> {
    if documents.is_empty() {
        return Ok(());
    }
    store
        .recreate_collection(name)
        .with_context(|| format!("recreating {name}"))?;
    let inserted = store
        .load_collection(name)?
        .insert_many(documents)
        .with_context(|| format!("seeding {name}"))?;
    info!("seeded {} documents into {}", inserted, name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seiscore::store::MemoryAdapter;

    fn seed() -> SeedData {
        serde_json::from_str(
            r#"{
                "networks": [{"code": "GE", "desc": "GEOFON", "stations": [
                    {"net": "GE", "stat": "APE", "lat": 37.07, "lon": 25.53},
                    {"net": "GE", "stat": "SANT", "lat": 36.37, "lon": 25.46}
                ]}],
                "channels": [{"net": "GE", "stat": "APE", "loc": "", "cha": "BHZ", "sample_rate": 20.0}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn nested_stations_are_flattened() {
        let mut store = DocumentStore::new("seed.db", MemoryAdapter::new());
        store.init_db().unwrap();
        apply_seed(&mut store, &seed()).unwrap();

        let stations: Vec<Station> = store.collection("stations").unwrap().all().unwrap();
        assert_eq!(stations.len(), 2);
        let networks: Vec<FdsnNetwork> = store.collection("networks").unwrap().all().unwrap();
        assert!(networks[0].stations.is_empty());
        assert_eq!(store.collection("channels").unwrap().len(), 1);
    }

    #[test]
    fn reseeding_replaces_previous_documents() {
        let mut store = DocumentStore::new("seed.db", MemoryAdapter::new());
        store.init_db().unwrap();
        apply_seed(&mut store, &seed()).unwrap();
        apply_seed(&mut store, &seed()).unwrap();
        assert_eq!(store.collection("stations").unwrap().len(), 2);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SeedData::load("/nonexistent/seed.json").unwrap_err();
        assert!(err.to_string().contains("reading seed file"));
    }
}
