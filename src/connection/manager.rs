//! Core ConnectionManager struct: a blocking admin client over the async driver.

use mongodb::bson::doc;
use mongodb::{Client, Database};
use tokio::runtime::Runtime;

use crate::connection::admin::AdminClient;
use crate::connection::types::DatabaseEntry;
use crate::error::Result;
use crate::helpers::redact_uri_password;

/// Owns a MongoDB client and the Tokio runtime its calls are driven on.
///
/// Every method blocks until the server has answered, one round-trip at a time.
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
    pub(crate) client: Client,
}

impl ConnectionManager {
    /// Connect to `uri` and ping the server (runs in Tokio runtime)
    pub fn connect(uri: &str) -> Result<Self> {
        let runtime = Runtime::new()?;
        log::debug!("Connecting to {}", redact_uri_password(uri));

        let client = runtime.block_on(async {
            let client = Client::with_uri_str(uri).await?;

            // Ping to verify connection
            client.database("admin").run_command(doc! { "ping": 1 }).await?;

            Ok::<_, mongodb::error::Error>(client)
        })?;

        Ok(Self { runtime, client })
    }

    /// Wrap an existing client, driving it on `runtime`.
    pub fn from_client(runtime: Runtime, client: Client) -> Self {
        Self { runtime, client }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        // The driver cleans up through spawned tasks, which need the runtime still running.
        let client = self.client.clone();
        self.runtime.block_on(async move { client.shutdown().await });
    }
}

impl AdminClient for ConnectionManager {
    type Database<'a> = MongoDatabase<'a>;

    /// List databases with their on-disk size, in server order (runs in Tokio runtime)
    fn list_databases(&self) -> Result<Vec<DatabaseEntry>> {
        let specs = self.runtime.block_on(async { self.client.list_databases().await })?;
        Ok(specs
            .into_iter()
            .map(|spec| DatabaseEntry { name: spec.name, size_on_disk: spec.size_on_disk })
            .collect())
    }

    fn database<'a>(&'a self, name: &str) -> MongoDatabase<'a> {
        MongoDatabase { runtime: &self.runtime, db: self.client.database(name) }
    }
}

/// Handle to one database of a [`ConnectionManager`].
pub struct MongoDatabase<'a> {
    pub(crate) runtime: &'a Runtime,
    pub(crate) db: Database,
}
