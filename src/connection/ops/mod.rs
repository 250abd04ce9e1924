//! Database commands issued through a [`MongoDatabase`] handle, split by concern.

pub mod collections;
pub mod stats;

pub use collections::CollectionCursor;

use crate::connection::admin::DatabaseAdmin;
use crate::connection::manager::MongoDatabase;
use crate::connection::types::{CollectionStats, DatabaseStats, Scale};
use crate::error::Result;

impl DatabaseAdmin for MongoDatabase<'_> {
    type Collections<'a>
        = CollectionCursor<'a>
    where
        Self: 'a;

    fn name(&self) -> &str {
        self.db.name()
    }

    fn stats(&self, scale: Scale) -> Result<DatabaseStats> {
        self.database_stats(scale)
    }

    fn list_collections(&self, batch_size: u32) -> Result<CollectionCursor<'_>> {
        self.collection_cursor(batch_size)
    }

    fn count_documents(&self, collection: &str) -> Result<u64> {
        self.count_all(collection)
    }

    fn collection_stats(&self, collection: &str, scale: Scale) -> Result<CollectionStats> {
        self.coll_stats(collection, scale)
    }

    fn drop_collection(&self, collection: &str) -> Result<()> {
        self.drop_one(collection)
    }
}
