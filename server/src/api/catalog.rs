use anyhow::anyhow;
use seiscore::model::{FdsnChannel, FdsnNetwork, Station};
use seiscore::store::DocumentStore;
use seiscore::StoreError;
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

/// Read-side view of the inventory collections served over HTTP.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<RwLock<DocumentStore>>,
}

impl Catalog {
    pub fn new(store: Arc<RwLock<DocumentStore>>) -> Self {
        Self { store }
    }

    fn all<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<Vec<T>> {
        let guard = self
            .store
            .read()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        let collection = guard
            .collection(name)
            .ok_or_else(|| StoreError::MissingCollection(name.to_string()))?;
        Ok(collection.all()?)
    }

    pub fn networks(&self) -> anyhow::Result<Vec<FdsnNetwork>> {
        Ok(self
            .all::<FdsnNetwork>("networks")?
            .iter()
            .map(FdsnNetwork::without_stations)
            .collect())
    }

    pub fn stations(&self) -> anyhow::Result<Vec<Station>> {
        self.all("stations")
    }

    /// Networks with their stations nested, in network order.
    pub fn networks_with_stations(&self) -> anyhow::Result<Vec<FdsnNetwork>> {
        let stations = self.stations()?;
        let mut networks = self.networks()?;
        for network in &mut networks {
            network.stations = stations
                .iter()
                .filter(|station| station.net == network.code)
                .cloned()
                .collect();
        }
        Ok(networks)
    }

    pub fn channels(&self, net: Option<&str>, stat: Option<&str>) -> anyhow::Result<Vec<FdsnChannel>> {
        Ok(self
            .all::<FdsnChannel>("channels")?
            .into_iter()
            .filter(|channel| net.map_or(true, |net| channel.net == net))
            .filter(|channel| stat.map_or(true, |stat| channel.stat == stat))
            .collect())
    }

    /// Channels of every posted station, in channel-collection order.
    pub fn channels_for(&self, stations: &[Station]) -> anyhow::Result<Vec<FdsnChannel>> {
        Ok(self
            .all::<FdsnChannel>("channels")?
            .into_iter()
            .filter(|channel| stations.iter().any(|station| channel.belongs_to(station)))
            .collect())
    }
}
