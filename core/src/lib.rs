//! Core of the seismic data portal.
//!
//! Holds the station/network/event records, the great-circle helpers used to
//! filter stations by event proximity, the session working set with its
//! subscriber notifications, and the snapshotting document store that backs
//! the portal service.

pub mod filter;
pub mod geo;
pub mod model;
pub mod prelude;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod working_set;

pub use prelude::{PortalError, PortalResult, StoreError, WorkingSetError};
pub use service::StationsService;
pub use working_set::WorkingSet;
