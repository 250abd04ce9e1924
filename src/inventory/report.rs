//! Report model and its text rendering.

use std::fmt;

use crate::connection::{IndexSize, PRIMARY_KEY_INDEX, Scale};
use crate::helpers::{format_bytes_as, format_scaled};
use crate::inventory::lines::LineBuilder;

/// Gap between the statistics and the database name on a summary line.
const NAME_GAP: &str = "              ";

/// Unit for database-level sizes
pub const DATABASE_SCALE: Scale = Scale::Gigabytes;

/// Unit for per-index sizes
pub const INDEX_SCALE: Scale = Scale::Megabytes;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub name: String,
    pub document_count: u64,
    /// Index sizes in server order; `None` when index detail wasn't requested.
    pub indexes: Option<Vec<IndexSize>>,
}

impl CollectionSummary {
    /// `\t* orders (42)`
    pub fn line(&self) -> String {
        format!("\t* {} ({})", self.name, self.document_count)
    }

    /// `\t\tsku_1 - created_1`, or `None` if the collection only has `_id_`.
    pub fn index_line(&self) -> Option<String> {
        let names: Vec<&str> = self
            .indexes
            .as_deref()?
            .iter()
            .map(|index| index.name.as_str())
            .filter(|name| *name != PRIMARY_KEY_INDEX)
            .collect();

        if names.is_empty() { None } else { Some(format!("\t\t{}", names.join(" - "))) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSummary {
    pub name: String,
    /// Bytes, as reported by `listDatabases`
    pub size_on_disk: u64,
    /// In [`DATABASE_SCALE`] units
    pub data_size: f64,
    /// In [`DATABASE_SCALE`] units
    pub index_size: f64,
    pub objects: u64,
    pub collections: Vec<CollectionSummary>,
}

impl DatabaseSummary {
    /// ` * 1.000GB-0.250GB-0.010GB (1200)              shop`
    pub fn line(&self) -> String {
        format!(
            " * {}-{}-{} ({}){NAME_GAP}{}",
            format_bytes_as(self.size_on_disk, DATABASE_SCALE),
            format_scaled(self.data_size, DATABASE_SCALE),
            format_scaled(self.index_size, DATABASE_SCALE),
            self.objects,
            self.name
        )
    }
}

/// Databases in server order, each with its collections in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub databases: Vec<DatabaseSummary>,
}

impl Report {
    pub fn lines(&self) -> LineBuilder {
        let mut lines = LineBuilder::new();
        for database in &self.databases {
            lines.push(database.line());
            for collection in &database.collections {
                lines.push(collection.line());
                if let Some(indexes) = collection.index_line() {
                    lines.push(indexes);
                }
            }
        }
        lines
    }

    /// Lines joined with `\r\n`, without a trailing separator.
    pub fn render(&self) -> String {
        self.lines().finish()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
