//! Plain records exchanged between the portal service and its clients.

pub mod event;
pub mod network;
pub mod request;
pub mod selection;
pub mod station;

pub use event::{EventCatalog, EventsModel, FdsnEvent};
pub use network::{FdsnChannel, FdsnNetwork};
pub use request::{FdsnRequestType, RequestModel};
pub use selection::{
    BoundingBox, CodeChoice, StationDataSource, StationSelectionMethod, StationsModel,
    StreamSelectionMethod,
};
pub use station::{Station, StationEntry, StationKey};
