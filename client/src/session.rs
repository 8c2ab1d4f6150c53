use crate::portal::PortalClient;
use log::{info, warn};
use seiscore::model::{FdsnChannel, FdsnEvent, StationEntry, StationKey, StationsModel};
use seiscore::{StationsService, WorkingSetError};
use std::fmt::Write as _;
use std::io::Read;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Edits applied to the working set after the selection, in this order:
/// toggles, removals, inversion, removal of selected entries.
#[derive(Debug, Default, Clone)]
pub struct WorkingSetActions {
    pub toggle: Vec<StationKey>,
    pub remove: Vec<StationKey>,
    pub invert: bool,
    pub remove_selected: bool,
}

/// One client session: the fetched catalog and the working set built on it.
pub struct Session {
    client: PortalClient,
    service: StationsService,
}

impl Session {
    pub fn new(client: PortalClient) -> Self {
        Self {
            client,
            service: StationsService::new(),
        }
    }

    pub fn service(&self) -> &StationsService {
        &self.service
    }

    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    /// Pulls networks and stations. A failed fetch leaves that part empty.
    pub async fn load_catalog(&mut self) -> usize {
        let networks = self.client.get_networks_stations().await;
        self.service.set_networks(networks);
        let stations = self.client.get_stations().await;
        self.service.add_all_stations(&stations);
        self.service.inventory().len()
    }

    pub fn load_station_file<R: Read>(&mut self, reader: R) -> anyhow::Result<usize> {
        Ok(self.service.load_station_file(reader)?)
    }

    pub fn set_events(&mut self, events: Vec<FdsnEvent>) {
        info!("{} events selected", events.len());
        self.service.set_selected_events(events);
    }

    pub fn select(&mut self, model: &StationsModel) -> usize {
        self.service.add_selected_stations(model)
    }

    /// Applies `actions`; keys missing from the working set are reported and
    /// skipped.
    pub fn apply(&mut self, actions: &WorkingSetActions) -> Vec<WorkingSetError> {
        let mut misses = Vec::new();
        for key in &actions.toggle {
            if let Err(err) = self.service.toggle_station_selection(key) {
                misses.push(err);
            }
        }
        for key in &actions.remove {
            if let Err(err) = self.service.remove_station_selection(key) {
                misses.push(err);
            }
        }
        if actions.invert {
            self.service.invert_stations_selection();
        }
        if actions.remove_selected {
            let removed = self.service.remove_selected_stations();
            info!("removed {} selected stations", removed);
        }
        misses
    }

    pub async fn streams(&self) -> Vec<FdsnChannel> {
        let selected: Vec<StationEntry> = self.service.working_set().selected().cloned().collect();
        self.client.get_streams_for_working_set(&selected).await
    }
}

/// Takes every pending working-set notification and returns the station
/// count each one carried. Updates lost to a slow receiver are logged and
/// skipped; draining continues with the oldest one still buffered.
pub fn drain_updates(receiver: &mut broadcast::Receiver<Vec<StationEntry>>) -> Vec<usize> {
    let mut sizes = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(update) => sizes.push(update.len()),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("missed {} working set updates", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    sizes
}

pub fn render_working_set(entries: &[StationEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let mark = if entry.selected { 'x' } else { ' ' };
        let _ = writeln!(
            out,
            "[{}] {:<12} {}  {}",
            mark,
            entry.key().to_string(),
            entry.coordinates(),
            entry.station.name
        );
    }
    out
}

pub fn render_channels(channels: &[FdsnChannel]) -> String {
    let mut out = String::new();
    for channel in channels {
        let _ = writeln!(
            out,
            "{}.{}.{}.{} {} Hz",
            channel.net, channel.stat, channel.loc, channel.cha, channel.sample_rate
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use seiscore::model::Station;
    use std::time::Duration;

    fn offline_session() -> Session {
        let client = PortalClient::new(
            Environment::from_base("http://127.0.0.1:9"),
            Duration::from_secs(1),
        )
        .unwrap();
        let mut session = Session::new(client);
        let file = r#"[
            {"net": "GE", "stat": "APE", "lat": 37.07, "lon": 25.53, "name": "Apeiranthos"},
            {"net": "HL", "stat": "ATH", "lat": 37.97, "lon": 23.72, "name": "Athens"}
        ]"#;
        session.load_station_file(file.as_bytes()).unwrap();
        session
    }

    fn file_model() -> StationsModel {
        StationsModel {
            data_source: seiscore::model::StationDataSource::File,
            ..Default::default()
        }
    }

    #[test]
    fn actions_report_missing_keys() {
        let mut session = offline_session();
        assert_eq!(session.select(&file_model()), 2);
        let actions = WorkingSetActions {
            toggle: vec![StationKey::new("GE", "APE"), StationKey::new("XX", "NONE")],
            remove_selected: true,
            ..Default::default()
        };
        let misses = session.apply(&actions);
        assert_eq!(misses.len(), 1);
        let remaining = session.service().working_set().entries();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].station.stat, "APE");
    }

    #[test]
    fn drain_skips_past_missed_updates() {
        let mut session = offline_session();
        let mut updates = session.service().subscribe();
        session.select(&file_model());
        for _ in 0..20 {
            session.service.refresh_stations();
        }

        let sizes = drain_updates(&mut updates);
        assert_eq!(sizes.len(), 16);
        assert!(sizes.iter().all(|&size| size == 2));

        session.service.remove_all_stations();
        assert_eq!(drain_updates(&mut updates), vec![0]);
    }

    #[test]
    fn render_marks_selection() {
        let mut entry = StationEntry::new(Station {
            net: "GE".into(),
            stat: "APE".into(),
            lat: 37.07,
            lon: 25.53,
            name: "Apeiranthos".into(),
            ..Default::default()
        });
        let selected = render_working_set(std::slice::from_ref(&entry));
        assert!(selected.starts_with("[x] GE.APE"));
        assert!(selected.contains("Lat: 37.07, Lon: 25.53  Apeiranthos"));
        entry.selected = false;
        assert!(render_working_set(&[entry]).starts_with("[ ] GE.APE"));
    }

    #[tokio::test]
    async fn unreachable_catalog_leaves_inventory_empty() {
        let client = PortalClient::new(
            Environment::from_base("http://127.0.0.1:9"),
            Duration::from_secs(1),
        )
        .unwrap();
        let mut session = Session::new(client);
        assert_eq!(session.load_catalog().await, 0);
        assert_eq!(session.select(&StationsModel::default()), 0);
        assert_eq!(session.client().metrics().failed(), 2);
    }
}
