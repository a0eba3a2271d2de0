use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error, ErrorKind};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use tracing::info;

use super::{SchemaStore, StoreError};

/// `createCollection` against a name that already exists.
const NAMESPACE_EXISTS: i32 = 48;

/// MongoDB-backed schema store.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to `uri` and bind to `database`.
    ///
    /// The driver connects lazily; unreachable instances surface on the
    /// first operation, bounded by `server_selection_timeout`.
    pub async fn new(
        uri: &str,
        database: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(connection_or_admin)?;
        options.server_selection_timeout = Some(server_selection_timeout);
        options.app_name = Some("scraperdb-init".to_string());

        let hosts = options
            .hosts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let client = Client::with_options(options).map_err(connection_or_admin)?;
        info!("MongoDB target: {hosts} (database={database})");

        Ok(Self {
            db: client.database(database),
        })
    }
}

#[async_trait]
impl SchemaStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(connection_or_admin)
    }

    async fn ensure_collection(&self, name: &str) -> Result<(), StoreError> {
        match self.db.create_collection(name, None).await {
            Ok(()) => Ok(()),
            Err(err) if command_error_code(&err) == Some(NAMESPACE_EXISTS) => Ok(()),
            Err(err) => Err(connection_or_admin(err)),
        }
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // createIndexes is a server-side no-op when an identical index
        // already exists.
        self.db
            .collection::<Document>(collection)
            .create_index(index, None)
            .await
            .map(|_| ())
            .map_err(|err| classify_index_error(err, collection, field))
    }
}

fn connection_or_admin(err: Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { message, .. } => StoreError::Connection(message.clone()),
        ErrorKind::Io(io) => StoreError::Connection(io.to_string()),
        _ => StoreError::Administrative(err.to_string()),
    }
}

fn classify_index_error(err: Error, collection: &str, field: &str) -> StoreError {
    match command_error_code(&err) {
        Some(code) if is_duplicate_key_code(code) => StoreError::ConstraintViolation {
            collection: collection.to_string(),
            field: field.to_string(),
            message: err.to_string(),
        },
        _ => connection_or_admin(err),
    }
}

fn command_error_code(err: &Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => Some(cmd.code),
        _ => None,
    }
}

/// 11000/11001 are the duplicate-key codes, 12582 the legacy sharded
/// variant.
fn is_duplicate_key_code(code: i32) -> bool {
    matches!(code, 11000 | 11001 | 12582)
}
