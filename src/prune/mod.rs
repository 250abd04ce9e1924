//! Cache pruner: drops every collection, in every database, whose name the
//! configured matcher accepts. Drops are irreversible and not transactional;
//! a failure stops the walk and leaves earlier drops in place.

pub mod matcher;

pub use matcher::{CollectionMatcher, DEFAULT_CACHE_MARKER, MatcherConfig};

use crate::connection::{AdminClient, DEFAULT_BATCH_SIZE, DatabaseAdmin, SYSTEM_INDEXES};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct PruneOptions {
    pub matcher: CollectionMatcher,
    /// Only report what would be dropped
    pub dry_run: bool,
    /// Batch size for the collection listing cursor
    pub batch_size: u32,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            matcher: CollectionMatcher::default(),
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCollection {
    pub database: String,
    pub collection: String,
}

impl DroppedCollection {
    /// Output line: the collection name, or `would drop db.coll` in dry-run mode.
    pub fn line(&self, dry_run: bool) -> String {
        if dry_run {
            format!("would drop {}.{}", self.database, self.collection)
        } else {
            self.collection.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Matching collections in traversal order
    pub dropped: Vec<DroppedCollection>,
    pub dry_run: bool,
}

/// Whether `name` should be dropped under `matcher`.
pub fn is_drop_candidate(matcher: &CollectionMatcher, name: &str) -> bool {
    name != SYSTEM_INDEXES && matcher.is_match(name)
}

/// Drop every matching collection visible to `client`.
pub fn prune_collections<C: AdminClient>(
    client: &C,
    options: &PruneOptions,
) -> Result<PruneOutcome> {
    prune_collections_with(client, options, |_| Ok(()))
}

/// Like [`prune_collections`], calling `on_drop` right after each collection
/// is dropped (or matched, in dry-run mode).
///
/// Collections reported before a failure are gone even though the error is
/// returned, so callers should print as they go.
pub fn prune_collections_with<C, F>(
    client: &C,
    options: &PruneOptions,
    mut on_drop: F,
) -> Result<PruneOutcome>
where
    C: AdminClient,
    F: FnMut(&DroppedCollection) -> Result<()>,
{
    let mut outcome = PruneOutcome { dropped: Vec::new(), dry_run: options.dry_run };

    for entry in client.list_databases()? {
        let db = client.database(&entry.name);
        prune_database(&db, options, &mut outcome, &mut on_drop)?;
    }

    log::info!(
        "{} {} collection(s) matching {}",
        if options.dry_run { "Would drop" } else { "Dropped" },
        outcome.dropped.len(),
        options.matcher
    );
    Ok(outcome)
}

fn prune_database<D, F>(
    db: &D,
    options: &PruneOptions,
    outcome: &mut PruneOutcome,
    on_drop: &mut F,
) -> Result<()>
where
    D: DatabaseAdmin,
    F: FnMut(&DroppedCollection) -> Result<()>,
{
    // Collect first so drops don't run while the listing cursor is still open.
    let names = db.list_collections(options.batch_size)?.collect::<Result<Vec<_>>>()?;

    for name in names {
        if !is_drop_candidate(&options.matcher, &name) {
            continue;
        }

        if options.dry_run {
            log::info!("Would drop {}.{}", db.name(), name);
        } else {
            log::info!("Dropping {}.{}", db.name(), name);
            db.drop_collection(&name)?;
        }

        let dropped = DroppedCollection { database: db.name().to_string(), collection: name };
        on_drop(&dropped)?;
        outcome.dropped.push(dropped);
    }

    Ok(())
}
