use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geo::GeoPoint;
use crate::prelude::PortalError;

/// Identity of a station across catalogs: network code plus station code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationKey {
    pub net: String,
    pub stat: String,
}

impl StationKey {
    pub fn new(net: impl Into<String>, stat: impl Into<String>) -> Self {
        Self {
            net: net.into(),
            stat: stat.into(),
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.net, self.stat)
    }
}

impl FromStr for StationKey {
    type Err = PortalError;

    /// Parses `NET.STA`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().split_once('.') {
            Some((net, stat)) if !net.is_empty() && !stat.is_empty() && !stat.contains('.') => {
                Ok(StationKey::new(net, stat))
            }
            _ => Err(PortalError::InvalidStationKey(value.to_string())),
        }
    }
}

/// Station record as served by the inventory endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Station {
    pub net: String,
    pub stat: String,
    pub lat: f64,
    pub lon: f64,
    pub elev: f64,
    pub name: String,
    pub start: String,
    pub end: String,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            net: "ALL".into(),
            stat: "ALL".into(),
            lat: 0.0,
            lon: 0.0,
            elev: 0.0,
            name: "All stations".into(),
            start: String::new(),
            end: String::new(),
        }
    }
}

impl Station {
    pub fn key(&self) -> StationKey {
        StationKey::new(self.net.clone(), self.stat.clone())
    }

    pub fn matches(&self, key: &StationKey) -> bool {
        self.net == key.net && self.stat == key.stat
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// A station held by the session working set, carrying its map selection flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEntry {
    #[serde(flatten)]
    pub station: Station,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl StationEntry {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            selected: true,
        }
    }

    pub fn key(&self) -> StationKey {
        self.station.key()
    }

    pub fn matches(&self, key: &StationKey) -> bool {
        self.station.matches(key)
    }

    /// Coordinates formatted for the station popup.
    pub fn coordinates(&self) -> String {
        format!("Lat: {:.2}, Lon: {:.2}", self.station.lat, self.station.lon)
    }
}

impl From<Station> for StationEntry {
    fn from(station: Station) -> Self {
        Self::new(station)
    }
}

impl Default for StationEntry {
    fn default() -> Self {
        Self::new(Station::default())
    }
}
