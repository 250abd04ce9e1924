//! Database and collection statistics commands.

use mongodb::bson::doc;

use crate::connection::manager::MongoDatabase;
use crate::connection::types::{CollectionStats, DatabaseStats, Scale, read_u64};
use crate::error::Result;

impl MongoDatabase<'_> {
    /// Fetch database stats (runs in Tokio runtime)
    pub fn database_stats(&self, scale: Scale) -> Result<DatabaseStats> {
        let command = doc! { "dbStats": 1, "scale": scale.factor() };
        let reply = self.runtime.block_on(async { self.db.run_command(command).await })?;
        Ok(DatabaseStats::from_document(&reply))
    }

    /// Fetch collection stats (runs in Tokio runtime)
    pub fn coll_stats(&self, collection: &str, scale: Scale) -> Result<CollectionStats> {
        let command = doc! { "collStats": collection, "scale": scale.factor() };
        let reply = self.runtime.block_on(async { self.db.run_command(command).await })?;
        Ok(CollectionStats::from_document(&reply))
    }

    /// Count every document of a collection with the `count` command (runs in Tokio runtime)
    pub fn count_all(&self, collection: &str) -> Result<u64> {
        let command = doc! { "count": collection };
        let reply = self.runtime.block_on(async { self.db.run_command(command).await })?;
        Ok(read_u64(&reply, "n"))
    }
}
