//! Embedded document store backing the portal service.

pub mod adapter;
pub mod collection;
pub mod database;

pub use adapter::{DatabaseSnapshot, FsAdapter, MemoryAdapter, PartitioningAdapter, SnapshotAdapter};
pub use collection::{Collection, ID_FIELD};
pub use database::{DocumentStore, DEFAULT_COLLECTIONS};
