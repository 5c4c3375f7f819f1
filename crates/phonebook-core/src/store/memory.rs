use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ContactStore, StoreError};
use crate::types::{Contact, ContactId};

/// In-memory store - ordered sequence behind a lock.
///
/// Ids come from a monotonic counter, so they are unique for the life of the
/// process and never reused after a delete.
pub struct MemoryStore {
    contacts: RwLock<Vec<Contact>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            contacts: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store pre-populated with the canonical phonebook entries
    pub fn seeded() -> Self {
        Self::with_contacts(vec![
            Contact::new(1u64, "Arto Hellas", "040-123456"),
            Contact::new(2u64, "Ada Lovelace", "39-44-5323523"),
            Contact::new(3u64, "Dan Abramov", "12-43-234345"),
            Contact::new(4u64, "Mary Poppendieck", "39-23-6423122"),
        ])
    }

    /// Store starting from the given contacts. The id counter resumes past
    /// the highest seeded id.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        Self {
            contacts: RwLock::new(contacts),
            next_id: AtomicU64::new(next_id),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.contacts.read().clone())
    }

    async fn get(&self, id: ContactId) -> Result<Option<Contact>, StoreError> {
        Ok(self.contacts.read().iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, name: String, number: String) -> Result<Contact, StoreError> {
        let id = ContactId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let contact = Contact { id, name, number };
        self.contacts.write().push(contact.clone());
        Ok(contact)
    }

    async fn replace(
        &self,
        id: ContactId,
        name: String,
        number: String,
    ) -> Result<Option<Contact>, StoreError> {
        let mut contacts = self.contacts.write();
        match contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.name = name;
                contact.number = number;
                Ok(Some(contact.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: ContactId) -> Result<bool, StoreError> {
        let mut contacts = self.contacts.write();
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        Ok(contacts.len() < before)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.contacts.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();

        let created = store
            .create("Arto Hellas".to_string(), "040-123456".to_string())
            .await
            .unwrap();

        let retrieved = store.get(created.id).await.unwrap();
        assert_eq!(retrieved, Some(created));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::new();
        assert!(store.get(ContactId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_never_reused() {
        let store = MemoryStore::new();

        let a = store.create("a".to_string(), "1".to_string()).await.unwrap();
        let b = store.create("b".to_string(), "2".to_string()).await.unwrap();
        assert!(b.id > a.id);

        store.remove(b.id).await.unwrap();
        let c = store.create("c".to_string(), "3".to_string()).await.unwrap();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();

        for (name, number) in [("a", "1"), ("b", "2"), ("c", "3")] {
            store
                .create(name.to_string(), number.to_string())
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_replace() {
        let store = MemoryStore::new();
        let created = store
            .create("Arto Hellas".to_string(), "040-123456".to_string())
            .await
            .unwrap();

        let updated = store
            .replace(created.id, "Arto Hellas".to_string(), "040-999999".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.number, "040-999999");
        assert_eq!(updated.id, created.id);

        let retrieved = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(retrieved.number, "040-999999");
    }

    #[tokio::test]
    async fn test_replace_nonexistent() {
        let store = MemoryStore::new();
        let result = store
            .replace(ContactId(5), "x".to_string(), "y".to_string())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        let created = store
            .create("Arto Hellas".to_string(), "040-123456".to_string())
            .await
            .unwrap();

        assert!(store.remove(created.id).await.unwrap());
        assert!(!store.remove(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let store = MemoryStore::new();
        assert_eq!(store.count().await.unwrap(), 0);

        store.create("a".to_string(), "1".to_string()).await.unwrap();
        store.create("b".to_string(), "2".to_string()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seeded_contains_four_canonical_contacts() {
        let store = MemoryStore::seeded();

        let contacts = store.list().await.unwrap();
        assert_eq!(contacts.len(), 4);
        assert_eq!(contacts[0].name, "Arto Hellas");
        assert_eq!(contacts[3].name, "Mary Poppendieck");

        // Counter resumes past the seeds
        let next = store.create("New Person".to_string(), "000".to_string()).await.unwrap();
        assert_eq!(next.id, ContactId(5));
    }
}
