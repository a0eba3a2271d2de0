//! In-memory stand-in for a MongoDB instance, used by the initializer
//! tests the way the original suite used mongomock.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::Document;

use super::{SchemaStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, MemCollection>>,
}

#[derive(Default)]
struct MemCollection {
    docs: Vec<Document>,
    unique_fields: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load documents without any constraint checks, modeling state that
    /// existed before this tool ran.
    pub fn seed(&self, collection: &str, docs: Vec<Document>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .entry(collection.to_string())
            .or_default()
            .docs
            .extend(docs);
    }

    /// Insert one document, enforcing the declared unique indexes.
    pub fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let col = inner.entry(collection.to_string()).or_default();
        for field in &col.unique_fields {
            let value = doc.get(field);
            if col.docs.iter().any(|d| d.get(field) == value) {
                return Err(StoreError::ConstraintViolation {
                    collection: collection.to_string(),
                    field: field.clone(),
                    message: "duplicate key".to_string(),
                });
            }
        }
        col.docs.push(doc);
        Ok(())
    }

    pub fn collection_names(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut names: Vec<String> = inner.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_unique_index(&self, collection: &str, field: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .get(collection)
            .map(|col| col.unique_fields.iter().any(|f| f == field))
            .unwrap_or(false)
    }

    pub fn document_count(&self, collection: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.get(collection).map(|col| col.docs.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_collection(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        // createIndex creates the collection implicitly.
        let col = inner.entry(collection.to_string()).or_default();
        if col.unique_fields.iter().any(|f| f == field) {
            return Ok(());
        }
        for (i, doc) in col.docs.iter().enumerate() {
            if col.docs[..i].iter().any(|d| d.get(field) == doc.get(field)) {
                return Err(StoreError::ConstraintViolation {
                    collection: collection.to_string(),
                    field: field.to_string(),
                    message: "existing documents contain duplicate values".to_string(),
                });
            }
        }
        col.unique_fields.push(field.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_insert_respects_declared_index() {
        let store = MemoryStore::new();
        store.ensure_unique_index("articles", "url").await.unwrap();

        store
            .insert("articles", doc! { "_id": "a", "url": "https://x/1" })
            .unwrap();
        let err = store
            .insert("articles", doc! { "_id": "b", "url": "https://x/1" })
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_unconstrained_without_index() {
        let store = MemoryStore::new();
        store.ensure_collection("articles").await.unwrap();

        store.insert("articles", doc! { "_id": "a" }).unwrap();
        store.insert("articles", doc! { "_id": "a" }).unwrap();
        assert_eq!(store.document_count("articles"), 2);
    }
}
