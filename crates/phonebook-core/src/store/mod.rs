mod memory;
mod document;

pub use memory::MemoryStore;
pub use document::DocumentStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::types::{Contact, ContactId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),
    #[error("stored document is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Trait for contact storage backends.
///
/// The in-memory backend never fails in practice; the document backend can
/// fail on any call. Callers treat every operation as fallible so the two
/// stay interchangeable.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts, in insertion order
    async fn list(&self) -> Result<Vec<Contact>, StoreError>;

    /// Look up one contact by id
    async fn get(&self, id: ContactId) -> Result<Option<Contact>, StoreError>;

    /// Store a new contact, assigning its id
    async fn create(&self, name: String, number: String) -> Result<Contact, StoreError>;

    /// Replace name/number of an existing contact; `None` if the id is absent
    async fn replace(
        &self,
        id: ContactId,
        name: String,
        number: String,
    ) -> Result<Option<Contact>, StoreError>;

    /// Remove a contact; `false` if the id was already absent
    async fn remove(&self, id: ContactId) -> Result<bool, StoreError>;

    /// Number of stored contacts
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Create a contact store from config
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn ContactStore>, StoreError> {
    match config {
        StorageConfig::Memory { seeded } => {
            let store = if *seeded {
                MemoryStore::seeded()
            } else {
                MemoryStore::new()
            };
            Ok(Arc::new(store))
        }
        StorageConfig::Document { data_path } => {
            Ok(Arc::new(DocumentStore::open(data_path)?))
        }
    }
}
