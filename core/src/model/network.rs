use serde::{Deserialize, Serialize};

use super::station::Station;

/// Network record; `stations` is only populated by the combined endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FdsnNetwork {
    pub code: String,
    pub desc: String,
    pub start: String,
    pub end: String,
    pub stations: Vec<Station>,
}

impl Default for FdsnNetwork {
    fn default() -> Self {
        Self {
            code: "ALL".into(),
            desc: "ALL".into(),
            start: String::new(),
            end: String::new(),
            stations: Vec::new(),
        }
    }
}

impl FdsnNetwork {
    pub fn without_stations(&self) -> Self {
        Self {
            stations: Vec::new(),
            ..self.clone()
        }
    }
}

/// Stream (channel) metadata attached to a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FdsnChannel {
    pub net: String,
    pub stat: String,
    pub loc: String,
    pub cha: String,
    pub sample_rate: f64,
    pub start: String,
    pub end: String,
}

impl FdsnChannel {
    pub fn belongs_to(&self, station: &Station) -> bool {
        self.net == station.net && self.stat == station.stat
    }
}
