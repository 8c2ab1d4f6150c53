use crate::model::StationKey;

/// Errors raised by working-set lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkingSetError {
    #[error("station {0} is not in the working set")]
    NotFound(StationKey),
}

/// Errors raised by the document store and its snapshot adapters.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("collection {0} does not exist")]
    MissingCollection(String),
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
    #[error("snapshot of {0} has not been loaded; refusing to overwrite it")]
    NotLoaded(String),
    #[error("documents must be JSON objects, got {0}")]
    NotADocument(String),
}

/// Common error type for the portal core.
#[derive(thiserror::Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    WorkingSet(#[from] WorkingSetError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid station file: {0}")]
    InvalidStationFile(#[from] serde_json::Error),
    #[error("invalid station key {0:?}, expected NET.STA")]
    InvalidStationKey(String),
    #[error("invalid event record on line {line}: {reason}")]
    InvalidEventRecord { line: usize, reason: String },
}

pub type PortalResult<T> = Result<T, PortalError>;
pub type StoreResult<T> = Result<T, StoreError>;
