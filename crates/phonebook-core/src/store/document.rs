use std::path::Path;

use async_trait::async_trait;
use sled::Db;

use super::{ContactStore, StoreError};
use crate::types::{Contact, ContactId};

/// Document store - one JSON document per contact, backed by sled.
///
/// Keys are the big-endian bytes of a store-generated id, so iteration order
/// matches creation order and ids are unique across restarts.
pub struct DocumentStore {
    db: Db,
}

impl DocumentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Flush to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Contact, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl ContactStore for DocumentStore {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        let mut contacts = Vec::with_capacity(self.db.len());
        for row in self.db.iter() {
            let (_key, value) = row?;
            contacts.push(Self::decode(&value)?);
        }
        Ok(contacts)
    }

    async fn get(&self, id: ContactId) -> Result<Option<Contact>, StoreError> {
        match self.db.get(id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, name: String, number: String) -> Result<Contact, StoreError> {
        let id = ContactId(self.db.generate_id()?);
        let contact = Contact { id, name, number };
        self.db
            .insert(id.0.to_be_bytes(), serde_json::to_vec(&contact)?)?;
        Ok(contact)
    }

    async fn replace(
        &self,
        id: ContactId,
        name: String,
        number: String,
    ) -> Result<Option<Contact>, StoreError> {
        if self.db.get(id.0.to_be_bytes())?.is_none() {
            return Ok(None);
        }

        let contact = Contact { id, name, number };
        self.db
            .insert(id.0.to_be_bytes(), serde_json::to_vec(&contact)?)?;
        Ok(Some(contact))
    }

    async fn remove(&self, id: ContactId) -> Result<bool, StoreError> {
        Ok(self.db.remove(id.0.to_be_bytes())?.is_some())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.db.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_and_get() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("contacts")).unwrap();

        let created = store
            .create("Arto Hellas".to_string(), "040-123456".to_string())
            .await
            .unwrap();

        let retrieved = store.get(created.id).await.unwrap();
        assert_eq!(retrieved, Some(created));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("contacts")).unwrap();

        assert!(store.get(ContactId(123)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("contacts")).unwrap();

        let created = store
            .create("Ada Lovelace".to_string(), "39-44-5323523".to_string())
            .await
            .unwrap();

        let updated = store
            .replace(created.id, "Ada Lovelace".to_string(), "040-0000".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.number, "040-0000");

        let retrieved = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(retrieved.number, "040-0000");
    }

    #[tokio::test]
    async fn test_replace_nonexistent() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("contacts")).unwrap();

        let result = store
            .replace(ContactId(9), "x".to_string(), "y".to_string())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("contacts")).unwrap();

        let created = store
            .create("Dan Abramov".to_string(), "12-43-234345".to_string())
            .await
            .unwrap();

        assert!(store.remove(created.id).await.unwrap());
        assert!(!store.remove(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts");

        let contact_id;

        // Write and close
        {
            let store = DocumentStore::open(&path).unwrap();
            let created = store
                .create("Mary Poppendieck".to_string(), "39-23-6423122".to_string())
                .await
                .unwrap();
            contact_id = created.id;
            store.flush().unwrap();
        }

        // Reopen and read
        {
            let store = DocumentStore::open(&path).unwrap();
            let retrieved = store.get(contact_id).await.unwrap();
            assert_eq!(retrieved.unwrap().name, "Mary Poppendieck");
        }
    }

    #[tokio::test]
    async fn test_ids_not_reused_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts");

        let first_id;
        {
            let store = DocumentStore::open(&path).unwrap();
            first_id = store
                .create("a".to_string(), "1".to_string())
                .await
                .unwrap()
                .id;
            store.remove(first_id).await.unwrap();
            store.flush().unwrap();
        }

        {
            let store = DocumentStore::open(&path).unwrap();
            let second_id = store
                .create("b".to_string(), "2".to_string())
                .await
                .unwrap()
                .id;
            assert_ne!(second_id, first_id);
        }
    }

    #[tokio::test]
    async fn test_count() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("contacts")).unwrap();

        assert_eq!(store.count().await.unwrap(), 0);

        store.create("a".to_string(), "1".to_string()).await.unwrap();
        store.create("b".to_string(), "2".to_string()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
