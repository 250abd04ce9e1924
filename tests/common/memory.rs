//! In-memory `AdminClient` for traversal tests that don't need a server.
//!
//! Every command is recorded as a short string (`"count shop.orders"`) so tests
//! can assert on exactly which commands ran, in which order. `fail_on` makes
//! one of those commands fail the way a permission error would.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;

use mongotree::connection::{
    AdminClient, CollectionStats, DatabaseAdmin, DatabaseEntry, DatabaseStats, IndexSize, Scale,
};
use mongotree::{Error, Result};

#[derive(Debug, Clone)]
pub struct FakeCollection {
    pub name: String,
    pub count: u64,
    /// Index sizes in MB, in creation order
    pub indexes: Vec<(String, f64)>,
}

#[derive(Debug, Clone)]
pub struct FakeDatabase {
    pub name: String,
    pub size_on_disk: u64,
    pub stats: DatabaseStats,
    pub collections: Vec<FakeCollection>,
}

impl FakeDatabase {
    pub fn new(name: &str, size_on_disk: u64) -> Self {
        Self {
            name: name.to_string(),
            size_on_disk,
            stats: DatabaseStats::default(),
            collections: Vec::new(),
        }
    }

    pub fn stats(mut self, data_size: f64, index_size: f64, objects: u64) -> Self {
        self.stats = DatabaseStats { data_size, index_size, objects };
        self
    }

    pub fn collection(self, name: &str, count: u64) -> Self {
        self.collection_with_indexes(name, count, &[("_id_", 0.004)])
    }

    pub fn collection_with_indexes(
        mut self,
        name: &str,
        count: u64,
        indexes: &[(&str, f64)],
    ) -> Self {
        self.collections.push(FakeCollection {
            name: name.to_string(),
            count,
            indexes: indexes.iter().map(|(name, size)| (name.to_string(), *size)).collect(),
        });
        self
    }
}

#[derive(Default)]
pub struct MemoryServer {
    databases: RefCell<Vec<FakeDatabase>>,
    calls: RefCell<Vec<String>>,
    cursors: RefCell<BTreeMap<i64, Vec<String>>>,
    next_cursor: Cell<i64>,
    fail_on: RefCell<Option<String>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(self, database: FakeDatabase) -> Self {
        self.databases.borrow_mut().push(database);
        self
    }

    /// Make the command recorded as `call` fail.
    pub fn fail_on(self, call: &str) -> Self {
        *self.fail_on.borrow_mut() = Some(call.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// `"db.collection"` for every drop issued, in order
    pub fn drops(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| call.strip_prefix("drop "))
            .map(str::to_string)
            .collect()
    }

    pub fn collection_names(&self, database: &str) -> Vec<String> {
        self.databases
            .borrow()
            .iter()
            .find(|db| db.name == database)
            .map(|db| db.collections.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<()> {
        let failing = self.fail_on.borrow().as_deref() == Some(call.as_str());
        self.calls.borrow_mut().push(call.clone());
        if failing {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("not authorized to run {call}"),
            )));
        }
        Ok(())
    }

    fn find_collection<T>(
        &self,
        database: &str,
        collection: &str,
        read: impl FnOnce(&FakeCollection) -> T,
    ) -> Option<T> {
        self.databases
            .borrow()
            .iter()
            .find(|db| db.name == database)?
            .collections
            .iter()
            .find(|c| c.name == collection)
            .map(read)
    }

    /// Split off one batch; the rest is parked under a cursor id (0 when nothing is left).
    fn open_cursor(&self, mut names: Vec<String>, batch_size: u32) -> (Vec<String>, i64) {
        let batch_size = batch_size.max(1) as usize;
        if names.len() <= batch_size {
            return (names, 0);
        }
        let rest = names.split_off(batch_size);
        let cursor_id = self.next_cursor.get() + 1;
        self.next_cursor.set(cursor_id);
        self.cursors.borrow_mut().insert(cursor_id, rest);
        (names, cursor_id)
    }

    fn get_more(
        &self,
        database: &str,
        cursor_id: i64,
        batch_size: u32,
    ) -> Result<(Vec<String>, i64)> {
        self.record(format!("getMore {database} {cursor_id}"))?;
        let rest = self
            .cursors
            .borrow_mut()
            .remove(&cursor_id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "cursor not found"))?;
        Ok(self.open_cursor(rest, batch_size))
    }
}

impl AdminClient for MemoryServer {
    type Database<'a> = MemoryDatabase<'a>;

    fn list_databases(&self) -> Result<Vec<DatabaseEntry>> {
        self.record("listDatabases".into())?;
        Ok(self
            .databases
            .borrow()
            .iter()
            .map(|db| DatabaseEntry { name: db.name.clone(), size_on_disk: db.size_on_disk })
            .collect())
    }

    fn database<'a>(&'a self, name: &str) -> MemoryDatabase<'a> {
        MemoryDatabase { server: self, name: name.to_string() }
    }
}

pub struct MemoryDatabase<'a> {
    server: &'a MemoryServer,
    name: String,
}

/// Paged listing over the fake's cursors, issuing a `getMore` per exhausted batch.
pub struct MemoryCollections<'a> {
    server: &'a MemoryServer,
    database: String,
    batch_size: u32,
    buffered: std::vec::IntoIter<String>,
    cursor_id: i64,
}

impl Iterator for MemoryCollections<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(name) = self.buffered.next() {
                return Some(Ok(name));
            }
            if self.cursor_id == 0 {
                return None;
            }
            match self.server.get_more(&self.database, self.cursor_id, self.batch_size) {
                Ok((names, cursor_id)) => {
                    self.buffered = names.into_iter();
                    self.cursor_id = cursor_id;
                }
                Err(e) => {
                    self.cursor_id = 0;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl DatabaseAdmin for MemoryDatabase<'_> {
    type Collections<'a>
        = MemoryCollections<'a>
    where
        Self: 'a;

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self, scale: Scale) -> Result<DatabaseStats> {
        assert_eq!(scale, Scale::Gigabytes, "database stats are always requested in GB");
        self.server.record(format!("dbStats {}", self.name))?;
        Ok(self
            .server
            .databases
            .borrow()
            .iter()
            .find(|db| db.name == self.name)
            .map(|db| db.stats.clone())
            .unwrap_or_default())
    }

    fn list_collections(&self, batch_size: u32) -> Result<MemoryCollections<'_>> {
        self.server.record(format!("listCollections {}", self.name))?;
        let names = self.server.collection_names(&self.name);
        let (first, cursor_id) = self.server.open_cursor(names, batch_size);
        Ok(MemoryCollections {
            server: self.server,
            database: self.name.clone(),
            batch_size,
            buffered: first.into_iter(),
            cursor_id,
        })
    }

    fn count_documents(&self, collection: &str) -> Result<u64> {
        self.server.record(format!("count {}.{}", self.name, collection))?;
        Ok(self.server.find_collection(&self.name, collection, |c| c.count).unwrap_or(0))
    }

    fn collection_stats(&self, collection: &str, scale: Scale) -> Result<CollectionStats> {
        assert_eq!(scale, Scale::Megabytes, "index sizes are always requested in MB");
        self.server.record(format!("collStats {}.{}", self.name, collection))?;
        let index_sizes = self
            .server
            .find_collection(&self.name, collection, |c| {
                c.indexes
                    .iter()
                    .map(|(name, size)| IndexSize { name: name.clone(), size: *size })
                    .collect()
            })
            .unwrap_or_default();
        Ok(CollectionStats { index_sizes })
    }

    fn drop_collection(&self, collection: &str) -> Result<()> {
        self.server.record(format!("drop {}.{}", self.name, collection))?;
        let mut databases = self.server.databases.borrow_mut();
        if let Some(db) = databases.iter_mut().find(|db| db.name == self.name) {
            db.collections.retain(|c| c.name != collection);
        }
        Ok(())
    }
}
