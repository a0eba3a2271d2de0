use anyhow::bail;
use serde::Deserialize;

// ──────────────────────────── Manifest ────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    #[serde(default = "default_unique")]
    pub unique: bool,
}

fn default_unique() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

/// Declarative description of the schema the initializer brings the
/// database to.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaManifest {
    #[serde(default)]
    pub collections: Vec<CollectionSpec>,
}

impl Default for SchemaManifest {
    /// The scraper pipeline's schema: raw articles and parsed plaintext
    /// keyed by document id, plus the category catalog.
    fn default() -> Self {
        Self {
            collections: vec![
                CollectionSpec {
                    name: "wikipedia".to_string(),
                    indexes: vec![IndexSpec {
                        field: "_id".to_string(),
                        unique: true,
                    }],
                },
                CollectionSpec {
                    name: "wiki_plain_articles".to_string(),
                    indexes: vec![IndexSpec {
                        field: "_id".to_string(),
                        unique: true,
                    }],
                },
                CollectionSpec {
                    name: "wiki_categories".to_string(),
                    indexes: vec![],
                },
            ],
        }
    }
}

impl SchemaManifest {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.collections.is_empty() {
            bail!("schema manifest declares no collections");
        }
        for collection in &self.collections {
            if collection.name.is_empty() {
                bail!("schema manifest contains a collection with an empty name");
            }
            for index in &collection.indexes {
                if index.field.is_empty() {
                    bail!(
                        "collection '{}' declares an index with an empty field",
                        collection.name
                    );
                }
                if !index.unique {
                    bail!(
                        "collection '{}' declares a non-unique index on '{}'; only unique indexes are supported",
                        collection.name,
                        index.field
                    );
                }
            }
        }
        Ok(())
    }
}
