//! Station selection against a [`StationsModel`].

use log::debug;

use crate::geo::GisHelper;
use crate::model::{FdsnEvent, Station, StationEntry, StationSelectionMethod, StationsModel};

/// Applies one selection method of a stations model to a candidate pool.
pub struct StationFilter<'a> {
    model: &'a StationsModel,
    events: &'a [FdsnEvent],
}

impl<'a> StationFilter<'a> {
    /// `events` are the currently selected events; only the `Events` method
    /// looks at them.
    pub fn new(model: &'a StationsModel, events: &'a [FdsnEvent]) -> Self {
        Self { model, events }
    }

    /// Returns the candidates accepted by the network choice and the selection
    /// method, in candidate order. Entries are cloned with their flag intact.
    pub fn apply(&self, candidates: &[StationEntry]) -> Vec<StationEntry> {
        let filtered: Vec<StationEntry> = candidates
            .iter()
            .filter(|entry| self.accepts(&entry.station))
            .cloned()
            .collect();
        debug!(
            "{:?} selection kept {} of {} candidates",
            self.model.station_selection_method,
            filtered.len(),
            candidates.len()
        );
        filtered
    }

    pub fn accepts(&self, station: &Station) -> bool {
        if !self.model.selected_network.accepts(&station.net) {
            return false;
        }

        match self.model.station_selection_method {
            StationSelectionMethod::Code => self.model.selected_station.accepts(&station.stat),
            StationSelectionMethod::Region => self.model.bounds.contains(station.position()),
            StationSelectionMethod::Events => self.has_qualifying_event(station),
        }
    }

    /// True when at least one selected event lies inside both the distance
    /// window (km) and the azimuth window, measured from the event origin.
    pub fn has_qualifying_event(&self, station: &Station) -> bool {
        let (distance_from, distance_to) = self.model.distance_window();
        let (azimuth_from, azimuth_to) = self.model.azimuth_window();
        let position = station.position();

        self.events.iter().any(|event| {
            let origin = event.origin();
            let distance = GisHelper::distance_km(origin, position);
            let bearing = GisHelper::azimuth_deg(origin, position);
            distance >= distance_from
                && distance <= distance_to
                && bearing >= azimuth_from
                && bearing <= azimuth_to
        })
    }
}
