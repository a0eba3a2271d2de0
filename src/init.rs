use tracing::info;

use crate::schema::SchemaManifest;
use crate::store::{SchemaStore, StoreError};

/// Bring the target database to the manifest's schema state in one
/// idempotent pass: for each collection, ensure it exists, then ensure
/// each declared unique index exists. The first failure aborts the pass.
pub async fn run(store: &dyn SchemaStore, manifest: &SchemaManifest) -> Result<(), StoreError> {
    for collection in &manifest.collections {
        store.ensure_collection(&collection.name).await?;
        info!("Collection ready: {}", collection.name);

        for index in &collection.indexes {
            store.ensure_unique_index(&collection.name, &index.field).await?;
            info!("Unique index ready: {}.{}", collection.name, index.field);
        }
    }
    Ok(())
}
