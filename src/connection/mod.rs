//! MongoDB administrative access.
//!
//! This module provides:
//! - `admin`: the `AdminClient` / `DatabaseAdmin` traits and per-database handles
//! - `ConnectionManager`: the blocking driver-backed implementation
//! - `ops`: the database commands behind each handle method
//! - `types`: values exchanged with the server

pub mod admin;
pub mod manager;
pub mod ops;
pub mod types;

pub use admin::{AdminClient, DatabaseAdmin};
pub use manager::{ConnectionManager, MongoDatabase};
pub use ops::CollectionCursor;
pub use types::{
    CollectionStats, DEFAULT_BATCH_SIZE, DatabaseEntry, DatabaseStats, IndexSize,
    PRIMARY_KEY_INDEX, SYSTEM_INDEXES, Scale,
};
