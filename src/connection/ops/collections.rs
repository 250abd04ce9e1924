//! Collection listing and dropping.

use futures::TryStreamExt;
use mongodb::Cursor;
use mongodb::bson::Document;
use mongodb::results::CollectionSpecification;
use tokio::runtime::Runtime;

use crate::connection::manager::MongoDatabase;
use crate::error::Result;

impl MongoDatabase<'_> {
    /// Open a `listCollections` cursor (runs in Tokio runtime)
    ///
    /// The driver keeps `getMore` on the server that opened the cursor and
    /// kills it if the listing is dropped early.
    pub fn collection_cursor(&self, batch_size: u32) -> Result<CollectionCursor<'_>> {
        let cursor = self
            .runtime
            .block_on(async { self.db.list_collections().batch_size(batch_size.max(1)).await })?;

        Ok(CollectionCursor {
            runtime: self.runtime,
            database: self.db.name().to_string(),
            cursor: Some(cursor),
        })
    }

    /// Drop a collection (runs in Tokio runtime)
    pub fn drop_one(&self, collection: &str) -> Result<()> {
        let coll = self.db.collection::<Document>(collection);
        self.runtime.block_on(async { coll.drop().await })?;
        Ok(())
    }
}

/// Blocking iterator over a driver cursor of collection specifications.
pub struct CollectionCursor<'a> {
    runtime: &'a Runtime,
    database: String,
    cursor: Option<Cursor<CollectionSpecification>>,
}

impl CollectionCursor<'_> {
    /// Dropping a live cursor spawns `killCursors`, which needs a runtime context.
    fn close(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            let _guard = self.runtime.enter();
            drop(cursor);
        }
    }
}

impl Iterator for CollectionCursor<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        let next = self.runtime.block_on(cursor.try_next());

        match next {
            Ok(Some(spec)) => Some(Ok(spec.name)),
            Ok(None) => {
                log::debug!("{}: collection listing exhausted", self.database);
                self.close();
                None
            }
            Err(e) => {
                self.close();
                Some(Err(e.into()))
            }
        }
    }
}

impl Drop for CollectionCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
