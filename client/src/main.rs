use anyhow::Context;
use clap::{Parser, ValueEnum};
use environment::Environment;
use log::{info, warn};
use portal::PortalClient;
use seiscore::model::{
    BoundingBox, CodeChoice, EventsModel, FdsnEvent, FdsnRequestType, RequestModel,
    StationDataSource, StationKey, StationSelectionMethod, StationsModel,
};
use session::{drain_updates, render_channels, render_working_set, Session, WorkingSetActions};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;

mod environment;
mod portal;
mod session;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    Code,
    Region,
    Events,
}

impl From<Method> for StationSelectionMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Code => StationSelectionMethod::Code,
            Method::Region => StationSelectionMethod::Region,
            Method::Events => StationSelectionMethod::Events,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RequestKind {
    Waveform,
    StationXml,
    StationText,
}

impl From<RequestKind> for FdsnRequestType {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Waveform => FdsnRequestType::Waveform,
            RequestKind::StationXml => FdsnRequestType::StationXml,
            RequestKind::StationText => FdsnRequestType::StationText,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Build a station working set from the seismic portal")]
struct Args {
    /// Portal service base URL
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    base_url: String,
    /// Endpoint URLs from YAML instead of --base-url
    #[arg(long)]
    environment: Option<PathBuf>,
    /// Starting selection model (JSON); the flags below override it
    #[arg(long)]
    selection: Option<PathBuf>,
    #[arg(long, value_enum)]
    method: Option<Method>,
    #[arg(long)]
    network: Option<String>,
    #[arg(long)]
    station: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    north: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    south: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    east: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    west: Option<f64>,
    /// Uploaded station catalog (JSON array); switches the data source to file
    #[arg(long)]
    station_file: Option<PathBuf>,
    /// Selected events as a JSON array
    #[arg(long)]
    events: Option<PathBuf>,
    /// Query the EMSC (0) or IRIS (1) event catalog for selected events
    #[arg(long)]
    event_catalog: Option<usize>,
    #[arg(long, default_value_t = 0.0)]
    min_magnitude: f64,
    #[arg(long)]
    distance_from: Option<f64>,
    #[arg(long)]
    distance_to: Option<f64>,
    #[arg(long)]
    azimuth_from: Option<f64>,
    #[arg(long)]
    azimuth_to: Option<f64>,
    /// Flip the selected flag of NET.STA (repeatable)
    #[arg(long)]
    toggle: Vec<StationKey>,
    /// Drop NET.STA from the working set (repeatable)
    #[arg(long)]
    remove: Vec<StationKey>,
    #[arg(long, default_value_t = false)]
    invert: bool,
    #[arg(long, default_value_t = false)]
    remove_selected: bool,
    /// Request stream metadata for the selected stations
    #[arg(long, default_value_t = false)]
    streams: bool,
    /// Product requested for the streams (defaults to waveform)
    #[arg(long, value_enum)]
    request_type: Option<RequestKind>,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Args {
    fn stations_model(&self) -> anyhow::Result<StationsModel> {
        let mut model = match self.selection.as_ref() {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("reading selection {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("parsing selection {}", path.display()))?
            }
            None => StationsModel::default(),
        };

        if let Some(method) = self.method {
            model.station_selection_method = method.into();
        }
        if let Some(network) = self.network.as_deref() {
            model.selected_network = CodeChoice::from(network);
        }
        if let Some(station) = self.station.as_deref() {
            model.selected_station = CodeChoice::from(station);
        }
        let defaults = model.bounds;
        model.bounds = BoundingBox::new(
            self.north.unwrap_or(defaults.north),
            self.south.unwrap_or(defaults.south),
            self.east.unwrap_or(defaults.east),
            self.west.unwrap_or(defaults.west),
        )
        .rounded();
        if self.station_file.is_some() {
            model.data_source = StationDataSource::File;
        }
        if let Some(value) = self.distance_from {
            model.event_distance_from = value;
        }
        if let Some(value) = self.distance_to {
            model.event_distance_to = value;
        }
        if let Some(value) = self.azimuth_from {
            model.event_azimuth_from = value;
        }
        if let Some(value) = self.azimuth_to {
            model.event_azimuth_to = value;
        }
        Ok(model)
    }

    fn request_model(&self) -> RequestModel {
        let mut request = RequestModel::default();
        if let Some(kind) = self.request_type {
            request.request_type = kind.into();
        }
        request
    }

    fn actions(&self) -> WorkingSetActions {
        WorkingSetActions {
            toggle: self.toggle.clone(),
            remove: self.remove.clone(),
            invert: self.invert,
            remove_selected: self.remove_selected,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("building client runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let env = match args.environment.as_ref() {
        Some(path) => Environment::load(path)?,
        None => Environment::from_base(&args.base_url),
    };
    let model = args.stations_model()?;
    let client = PortalClient::new(env, Duration::from_secs(args.timeout_secs))?;
    let mut session = Session::new(client);
    let mut notifications = session.service().subscribe();

    let inventory = session.load_catalog().await;
    info!("inventory holds {} stations", inventory);

    if let Some(path) = args.station_file.as_ref() {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        session.load_station_file(file)?;
    }

    let mut events = Vec::new();
    if let Some(path) = args.events.as_ref() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading events {}", path.display()))?;
        let loaded: Vec<FdsnEvent> = serde_json::from_str(&contents)
            .with_context(|| format!("parsing events {}", path.display()))?;
        events.extend(loaded);
    }
    if let Some(catalog) = args.event_catalog {
        let events_model = EventsModel {
            selected_catalog: catalog,
            minimum_magnitude: args.min_magnitude,
            ..Default::default()
        };
        info!("{}", events_model);
        events.extend(session.client().get_events(&events_model).await);
    }
    session.set_events(events);

    let added = session.select(&model);
    println!("{} -> {} stations added", model, added);

    for miss in session.apply(&args.actions()) {
        warn!("{}", miss);
    }

    for size in drain_updates(&mut notifications) {
        info!("working set update: {} stations", size);
    }

    print!("{}", render_working_set(session.service().working_set().entries()));

    if args.streams {
        println!("{}", args.request_model());
        let channels = session.streams().await;
        print!("{}", render_channels(&channels));
    }

    info!("portal calls: {}", session.client().metrics());
    Ok(())
}
