//! Inspect a MongoDB server's databases, collections and indexes, and prune
//! cache collections.

pub mod connection;
pub mod error;
pub mod helpers;
pub mod inventory;
pub mod prune;
pub mod shell;
pub mod state;

pub use connection::{AdminClient, ConnectionManager, DatabaseAdmin};
pub use error::{Error, Result};
pub use inventory::{Report, ReportOptions, collect_report, print_index_tree, print_tree};
pub use prune::{
    CollectionMatcher, PruneOptions, PruneOutcome, prune_collections, prune_collections_with,
};
