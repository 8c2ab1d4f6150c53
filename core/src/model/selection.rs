use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::GeoPoint;

/// Rectangular map region. Edges are inclusive and the box never wraps the
/// antimeridian: `west` must be the smaller longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            north: 90.0,
            south: -90.0,
            east: 180.0,
            west: -180.0,
        }
    }
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }

    /// Edges rounded to two decimals, as shown after a map drag.
    pub fn rounded(&self) -> Self {
        let round = |v: f64| (v * 100.0).round() / 100.0;
        Self {
            north: round(self.north),
            south: round(self.south),
            east: round(self.east),
            west: round(self.west),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}N, {}S, {}E, {}W",
            self.north, self.south, self.east, self.west
        )
    }
}

/// Either every code or one specific code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CodeChoice {
    #[default]
    All,
    Code(String),
}

impl CodeChoice {
    pub fn accepts(&self, code: &str) -> bool {
        match self {
            CodeChoice::All => true,
            CodeChoice::Code(expected) => expected == code,
        }
    }
}

impl From<String> for CodeChoice {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            CodeChoice::All
        } else {
            CodeChoice::Code(trimmed.to_string())
        }
    }
}

impl From<&str> for CodeChoice {
    fn from(value: &str) -> Self {
        CodeChoice::from(value.to_string())
    }
}

impl From<CodeChoice> for String {
    fn from(value: CodeChoice) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CodeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeChoice::All => f.write_str("All"),
            CodeChoice::Code(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationDataSource {
    #[default]
    Inventory,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationSelectionMethod {
    #[default]
    Code,
    Region,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSelectionMethod {
    #[default]
    Code,
    SamplingRate,
}

/// Station search form state. Rebuilt per session, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationsModel {
    pub year_from: String,
    pub year_to: String,
    pub bounds: BoundingBox,
    pub selected_network: CodeChoice,
    pub selected_station: CodeChoice,
    pub data_source: StationDataSource,
    pub station_selection_method: StationSelectionMethod,
    pub stream_selection_method: StreamSelectionMethod,
    /// Kilometres.
    pub event_distance_from: f64,
    pub event_distance_to: f64,
    /// Degrees clockwise from north.
    pub event_azimuth_from: f64,
    pub event_azimuth_to: f64,
    pub target_sampling_rate: f64,
}

impl Default for StationsModel {
    fn default() -> Self {
        Self {
            year_from: "1900".into(),
            year_to: "2100".into(),
            bounds: BoundingBox::default(),
            selected_network: CodeChoice::All,
            selected_station: CodeChoice::All,
            data_source: StationDataSource::Inventory,
            station_selection_method: StationSelectionMethod::Code,
            stream_selection_method: StreamSelectionMethod::Code,
            event_distance_from: 0.0,
            event_distance_to: 180.0,
            event_azimuth_from: 0.0,
            event_azimuth_to: 360.0,
            target_sampling_rate: 20.0,
        }
    }
}

impl StationsModel {
    pub fn clear_station_selection(&mut self) {
        self.selected_station = CodeChoice::All;
    }

    pub fn distance_window(&self) -> (f64, f64) {
        (self.event_distance_from, self.event_distance_to)
    }

    pub fn azimuth_window(&self) -> (f64, f64) {
        (self.event_azimuth_from, self.event_azimuth_to)
    }
}

impl fmt::Display for StationsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year: {} - {}, coordinates: {}, network: {}, station: {}",
            self.year_from, self.year_to, self.bounds, self.selected_network, self.selected_station
        )
    }
}
