//! Value types exchanged with the admin client.

use mongodb::bson::{Bson, Document};

/// Name of the legacy catalog collection that lists every index of a database.
/// It is not user data and is skipped by every traversal.
pub const SYSTEM_INDEXES: &str = "system.indexes";

/// Name of the index MongoDB builds on `_id` for every collection.
pub const PRIMARY_KEY_INDEX: &str = "_id_";

/// Batch size the server uses for cursors when none is requested.
pub const DEFAULT_BATCH_SIZE: u32 = 101;

/// One entry of `listDatabases`
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseEntry {
    pub name: String,
    /// Approximate on-disk size in bytes
    pub size_on_disk: u64,
}

/// Unit used for the `scale` argument of `dbStats` / `collStats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scale {
    Bytes,
    Megabytes,
    #[default]
    Gigabytes,
}

impl Scale {
    /// Divisor sent to the server
    pub fn factor(self) -> i64 {
        match self {
            Scale::Bytes => 1,
            Scale::Megabytes => 1024 * 1024,
            Scale::Gigabytes => 1024 * 1024 * 1024,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Scale::Bytes => "B",
            Scale::Megabytes => "MB",
            Scale::Gigabytes => "GB",
        }
    }

    /// Convert a raw byte count into this unit.
    pub fn apply(self, bytes: u64) -> f64 {
        bytes as f64 / self.factor() as f64
    }
}

/// Aggregate statistics for one database, in the unit they were requested with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseStats {
    pub data_size: f64,
    pub index_size: f64,
    pub objects: u64,
}

impl DatabaseStats {
    /// Read a `dbStats` reply. Missing or non-numeric fields count as zero.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            data_size: read_f64(doc, "dataSize"),
            index_size: read_f64(doc, "indexSize"),
            objects: read_u64(doc, "objects"),
        }
    }
}

/// Size of a single index, in the unit it was requested with.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSize {
    pub name: String,
    pub size: f64,
}

/// The part of `collStats` we use: index sizes in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStats {
    pub index_sizes: Vec<IndexSize>,
}

impl CollectionStats {
    pub fn from_document(doc: &Document) -> Self {
        let index_sizes = match doc.get_document("indexSizes") {
            Ok(sizes) => sizes
                .iter()
                .map(|(name, size)| IndexSize {
                    name: name.clone(),
                    size: bson_to_f64(size).unwrap_or(0.0),
                })
                .collect(),
            Err(_) => {
                log::warn!("collStats reply has no indexSizes, assuming no indexes");
                Vec::new()
            }
        };
        Self { index_sizes }
    }

    /// Index names other than the primary-key index, in server order.
    pub fn secondary_index_names(&self) -> impl Iterator<Item = &str> {
        self.index_sizes
            .iter()
            .map(|index| index.name.as_str())
            .filter(|name| *name != PRIMARY_KEY_INDEX)
    }
}

/// Read a count-like field (`n`, `objects`), coercing to zero when absent.
pub fn read_u64(doc: &Document, key: &str) -> u64 {
    match doc.get(key).and_then(bson_to_u64) {
        Some(value) => value,
        None => {
            log::warn!("Field '{key}' missing or not a number, treating as 0");
            0
        }
    }
}

/// Read a size field, coercing to zero when absent.
pub fn read_f64(doc: &Document, key: &str) -> f64 {
    match doc.get(key).and_then(bson_to_f64) {
        Some(value) => value,
        None => {
            log::warn!("Field '{key}' missing or not a number, treating as 0");
            0.0
        }
    }
}

fn bson_to_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(v) if *v >= 0 => Some(*v as u64),
        Bson::Int64(v) if *v >= 0 => Some(*v as u64),
        Bson::Double(v) if *v >= 0.0 => Some(*v as u64),
        _ => None,
    }
}

fn bson_to_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) if v.is_finite() => Some(*v),
        _ => None,
    }
}
