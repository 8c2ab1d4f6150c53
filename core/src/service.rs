//! Station catalog plus working set, driven by search-form actions.

use std::io::Read;

use tokio::sync::broadcast;

use crate::filter::StationFilter;
use crate::model::{
    FdsnEvent, FdsnNetwork, Station, StationDataSource, StationEntry, StationKey, StationsModel,
};
use crate::prelude::{PortalResult, WorkingSetError};
use crate::telemetry::LogManager;
use crate::working_set::WorkingSet;

pub struct StationsService {
    networks: Vec<FdsnNetwork>,
    inventory: Vec<StationEntry>,
    file_stations: Vec<StationEntry>,
    selected_events: Vec<FdsnEvent>,
    working_set: WorkingSet,
    logger: LogManager,
}

impl StationsService {
    pub fn new() -> Self {
        Self {
            networks: Vec::new(),
            inventory: Vec::new(),
            file_stations: Vec::new(),
            selected_events: Vec::new(),
            working_set: WorkingSet::new(),
            logger: LogManager::new("stations"),
        }
    }

    pub fn set_networks(&mut self, networks: Vec<FdsnNetwork>) {
        self.logger
            .record(&format!("catalog holds {} networks", networks.len()));
        self.networks = networks;
    }

    pub fn networks(&self) -> &[FdsnNetwork] {
        &self.networks
    }

    /// Appends inventory stations, each starting out selected.
    pub fn add_all_stations(&mut self, stations: &[Station]) {
        self.inventory
            .extend(stations.iter().cloned().map(StationEntry::new));
        self.logger
            .record(&format!("inventory holds {} stations", self.inventory.len()));
    }

    pub fn inventory(&self) -> &[StationEntry] {
        &self.inventory
    }

    /// Replaces the uploaded station catalog used by the `File` data source.
    /// The file is a JSON array of station records.
    pub fn load_station_file<R: Read>(&mut self, reader: R) -> PortalResult<usize> {
        let stations: Vec<Station> = serde_json::from_reader(reader)?;
        self.file_stations = stations.into_iter().map(StationEntry::new).collect();
        self.logger.record(&format!(
            "loaded {} stations from file",
            self.file_stations.len()
        ));
        Ok(self.file_stations.len())
    }

    pub fn set_selected_events(&mut self, events: Vec<FdsnEvent>) {
        self.selected_events = events;
    }

    pub fn selected_events(&self) -> &[FdsnEvent] {
        &self.selected_events
    }

    /// Filters the candidate pool of the model's data source and merges the
    /// result into the working set. Returns the number of stations added.
    pub fn add_selected_stations(&mut self, model: &StationsModel) -> usize {
        let candidates = match model.data_source {
            StationDataSource::Inventory => &self.inventory,
            StationDataSource::File => &self.file_stations,
        };
        let filtered = StationFilter::new(model, &self.selected_events).apply(candidates);
        let added = self.working_set.merge(filtered);
        self.logger.record(&format!("{} -> added {}", model, added));
        added
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Vec<StationEntry>> {
        self.working_set.subscribe()
    }

    pub fn subscribe_focus(&self) -> broadcast::Receiver<StationEntry> {
        self.working_set.subscribe_focus()
    }

    pub fn update_stations(&mut self, filtered: Vec<StationEntry>) -> usize {
        self.working_set.merge(filtered)
    }

    pub fn refresh_stations(&self) {
        self.working_set.refresh();
    }

    pub fn update_focused_station(&self, key: &StationKey) -> Result<StationEntry, WorkingSetError> {
        self.working_set.focus(key)
    }

    pub fn toggle_station_selection(&mut self, key: &StationKey) -> Result<bool, WorkingSetError> {
        self.working_set.toggle(key)
    }

    pub fn remove_station_selection(
        &mut self,
        key: &StationKey,
    ) -> Result<StationEntry, WorkingSetError> {
        self.working_set.remove(key)
    }

    pub fn remove_all_stations(&mut self) {
        self.working_set.remove_all();
    }

    pub fn remove_selected_stations(&mut self) -> usize {
        self.working_set.remove_selected()
    }

    pub fn invert_stations_selection(&mut self) {
        self.working_set.invert_all();
    }
}

impl Default for StationsService {
    fn default() -> Self {
        Self::new()
    }
}
