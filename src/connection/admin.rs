//! The administrative surface the reporter and pruner are written against.
//!
//! `AdminClient` is the server; `DatabaseAdmin` is an explicit handle to one
//! database. Handles carry their own addressing, so traversals never switch a
//! shared "current database".

use crate::connection::types::{CollectionStats, DatabaseEntry, DatabaseStats, Scale};
use crate::error::Result;

pub trait AdminClient {
    type Database<'a>: DatabaseAdmin
    where
        Self: 'a;

    /// All databases visible to the connection, in server order.
    fn list_databases(&self) -> Result<Vec<DatabaseEntry>>;

    /// Address a database. Never touches the server.
    fn database<'a>(&'a self, name: &str) -> Self::Database<'a>;
}

pub trait DatabaseAdmin {
    /// Collection names in server order, fetched lazily `batch_size` at a time.
    /// The iterator stops after the first error.
    type Collections<'a>: Iterator<Item = Result<String>>
    where
        Self: 'a;

    fn name(&self) -> &str;

    /// `dbStats` scaled to `scale`
    fn stats(&self, scale: Scale) -> Result<DatabaseStats>;

    /// Open a fresh `listCollections` cursor. Each call starts over.
    fn list_collections(&self, batch_size: u32) -> Result<Self::Collections<'_>>;

    /// `count` over the whole collection
    fn count_documents(&self, collection: &str) -> Result<u64>;

    /// `collStats` scaled to `scale`
    fn collection_stats(&self, collection: &str, scale: Scale) -> Result<CollectionStats>;

    fn drop_collection(&self, collection: &str) -> Result<()>;
}
