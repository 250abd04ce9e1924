//! Common test utilities: an in-memory admin client, and a MongoDB container
//! for driver-backed tests.
//!
//! A single MongoDB 7.0 container is shared per test binary (Rust compiles each
//! `tests/*.rs` file as a separate binary). Per-test isolation is achieved by
//! namespacing every database and marker with a short UUID suffix.
//!
//! `ConnectionManager` drives its own Tokio runtime, so driver-backed tests are
//! plain `#[test]` functions; seeding goes through a separate runtime owned by
//! the test handle.
//!
//! An `atexit` hook ensures the container is removed when the process exits.

#![allow(dead_code)]

pub mod memory;

use std::sync::OnceLock;

use mongodb::Client;
use mongodb::IndexModel;
use mongodb::bson::Document;
use mongodb::options::{ClientOptions, IndexOptions};
use mongotree::ConnectionManager;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::runtime::Runtime;

static CONNECTION_STRING: OnceLock<String> = OnceLock::new();

/// Docker container ID, stored globally so the `atexit` handler can remove it.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

/// Called by the C runtime on process exit. Forcibly removes the shared container.
extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Start the shared container once per test binary and return its URI.
///
/// The container lives on a background thread with its own runtime so it
/// outlives every test.
fn shared_connection_string() -> &'static str {
    CONNECTION_STRING.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let connection_string = format!("mongodb://{}:{}", host, port);

                // Readiness probe
                let opts = ClientOptions::parse(&connection_string).await.expect("Failed to parse");
                let probe = Client::with_options(opts).expect("Failed to create probe client");
                for _ in 0..30 {
                    if probe.list_database_names().await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                drop(probe);

                tx.send(connection_string).expect("Failed to send connection string");

                // Park forever, keeping the container alive until the process exits.
                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("Failed to receive connection string")
    })
}

/// Handle to the shared container with a per-test namespace.
pub struct MongoTestContainer {
    pub connection_string: String,
    test_id: String,
    runtime: Runtime,
    client: Client,
}

impl MongoTestContainer {
    pub fn start() -> Self {
        let connection_string = shared_connection_string().to_string();
        let runtime = Runtime::new().expect("Failed to create seeding runtime");
        let client = runtime
            .block_on(async { Client::with_uri_str(&connection_string).await })
            .expect("Failed to create client");

        // First 8 chars of a UUID v4 as a short, unique namespace suffix.
        let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();

        Self { connection_string, test_id, runtime, client }
    }

    /// Namespaced name, e.g. `shop_1a2b3c4d`
    pub fn name(&self, name: &str) -> String {
        format!("{}_{}", name, self.test_id)
    }

    /// Blocking admin client under test
    pub fn admin(&self) -> ConnectionManager {
        ConnectionManager::connect(&self.connection_string).expect("Failed to connect")
    }

    pub fn insert(&self, db: &str, collection: &str, docs: Vec<Document>) {
        let coll = self.client.database(db).collection::<Document>(collection);
        self.runtime.block_on(async { coll.insert_many(docs).await }).expect("Failed to insert");
    }

    pub fn create_collection(&self, db: &str, collection: &str) {
        let db = self.client.database(db);
        self.runtime
            .block_on(async { db.create_collection(collection).await })
            .expect("Failed to create collection");
    }

    pub fn create_index(&self, db: &str, collection: &str, field: &str) -> String {
        let coll = self.client.database(db).collection::<Document>(collection);
        let name = format!("{field}_idx");
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(name.clone()).build())
            .build();
        self.runtime.block_on(async { coll.create_index(index).await }).expect("Failed to index");
        name
    }

    pub fn collection_names(&self, db: &str) -> Vec<String> {
        let db = self.client.database(db);
        let mut names = self
            .runtime
            .block_on(async { db.list_collection_names().await })
            .expect("Failed to list collections");
        names.sort();
        names
    }
}

impl Drop for MongoTestContainer {
    fn drop(&mut self) {
        let client = self.client.clone();
        self.runtime.block_on(async move { client.shutdown().await });
    }
}
