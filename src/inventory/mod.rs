//! Inventory reporter: walks databases, collections and optionally indexes,
//! and summarises sizes and document counts.

pub mod lines;
pub mod report;

pub use lines::{LINE_SEPARATOR, LineBuilder};
pub use report::{CollectionSummary, DATABASE_SCALE, DatabaseSummary, INDEX_SCALE, Report};

use crate::connection::{
    AdminClient, DEFAULT_BATCH_SIZE, DatabaseAdmin, DatabaseEntry, SYSTEM_INDEXES,
};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// Also fetch per-collection index sizes
    pub indexes: bool,
    /// Batch size for the collection listing cursor
    pub batch_size: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { indexes: false, batch_size: DEFAULT_BATCH_SIZE }
    }
}

impl ReportOptions {
    pub fn with_indexes(self) -> Self {
        Self { indexes: true, ..self }
    }
}

/// Walk every database visible to `client`, in server order.
///
/// The first failing command aborts the walk and is returned as is.
pub fn collect_report<C: AdminClient>(client: &C, options: ReportOptions) -> Result<Report> {
    let entries = client.list_databases()?;
    log::debug!("Reporting on {} databases", entries.len());

    let mut databases = Vec::with_capacity(entries.len());
    for entry in entries {
        let db = client.database(&entry.name);
        databases.push(summarize_database(&db, entry, options)?);
    }

    Ok(Report { databases })
}

/// Summarise one database and each of its collections.
pub fn summarize_database<D: DatabaseAdmin>(
    db: &D,
    entry: DatabaseEntry,
    options: ReportOptions,
) -> Result<DatabaseSummary> {
    let stats = db.stats(DATABASE_SCALE)?;

    let mut collections = Vec::new();
    for name in db.list_collections(options.batch_size)? {
        let name = name?;
        if name == SYSTEM_INDEXES {
            continue;
        }
        collections.push(summarize_collection(db, name, options)?);
    }

    log::debug!("{}: {} collections, {} objects", entry.name, collections.len(), stats.objects);

    Ok(DatabaseSummary {
        name: entry.name,
        size_on_disk: entry.size_on_disk,
        data_size: stats.data_size,
        index_size: stats.index_size,
        objects: stats.objects,
        collections,
    })
}

fn summarize_collection<D: DatabaseAdmin>(
    db: &D,
    name: String,
    options: ReportOptions,
) -> Result<CollectionSummary> {
    let document_count = db.count_documents(&name)?;
    let indexes = if options.indexes {
        Some(db.collection_stats(&name, INDEX_SCALE)?.index_sizes)
    } else {
        None
    };

    Ok(CollectionSummary { name, document_count, indexes })
}

/// Database/collection tree as text
pub fn print_tree<C: AdminClient>(client: &C, batch_size: u32) -> Result<String> {
    let options = ReportOptions { batch_size, ..ReportOptions::default() };
    Ok(collect_report(client, options)?.render())
}

/// Database/collection/index tree as text
pub fn print_index_tree<C: AdminClient>(client: &C, batch_size: u32) -> Result<String> {
    let options = ReportOptions { batch_size, ..ReportOptions::default() }.with_indexes();
    Ok(collect_report(client, options)?.render())
}
