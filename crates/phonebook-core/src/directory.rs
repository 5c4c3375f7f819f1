use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::DirectoryConfig;
use crate::store::{create_store, ContactStore, StoreError};
use crate::types::{Contact, ContactDraft, ContactId, DirectoryInfo};

/// Errors surfaced to the response-mapping stage. Display strings for the
/// validation variants are the exact wire messages.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("name missing")]
    NameMissing,
    #[error("number missing")]
    NumberMissing,
    #[error("name must be unique")]
    NameTaken,
    #[error("malformatted id")]
    MalformattedId,
    #[error("contact not found")]
    NotFound,
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// The contact directory.
///
/// Owns the validation policy and delegates persistence to an injected
/// store, so the HTTP layer only translates errors into responses. Both
/// store backends get identical validation.
pub struct Directory {
    store: Arc<dyn ContactStore>,
    clock: Arc<dyn Clock>,
}

impl Directory {
    /// Create a directory from config with the system clock (production use)
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let store = create_store(&config.storage)?;
        Ok(Self::with_store(store, Arc::new(SystemClock)))
    }

    /// Create a directory over an existing store and clock (testing use)
    pub fn with_store(store: Arc<dyn ContactStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// All contacts, in storage order
    pub async fn list(&self) -> Result<Vec<Contact>, DirectoryError> {
        Ok(self.store.list().await?)
    }

    /// Look up one contact by its id string
    pub async fn get(&self, id: &str) -> Result<Contact, DirectoryError> {
        let id = parse_id(id)?;
        self.store
            .get(id)
            .await?
            .ok_or(DirectoryError::NotFound)
    }

    /// Validate and store a new contact
    pub async fn create(&self, draft: ContactDraft) -> Result<Contact, DirectoryError> {
        let name = required(draft.name, DirectoryError::NameMissing)?;

        if self.name_taken(&name).await? {
            return Err(DirectoryError::NameTaken);
        }

        let number = required(draft.number, DirectoryError::NumberMissing)?;

        let contact = self.store.create(name, number).await?;
        debug!("created contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    /// Replace name/number of an existing contact
    pub async fn update(&self, id: &str, draft: ContactDraft) -> Result<Contact, DirectoryError> {
        let id = parse_id(id)?;
        let name = required(draft.name, DirectoryError::NameMissing)?;
        let number = required(draft.number, DirectoryError::NumberMissing)?;

        let updated = self
            .store
            .replace(id, name, number)
            .await?
            .ok_or(DirectoryError::NotFound)?;
        debug!("updated contact {}", updated.id);
        Ok(updated)
    }

    /// Remove a contact. Succeeds whether or not the record existed.
    pub async fn remove(&self, id: &str) -> Result<(), DirectoryError> {
        let id = parse_id(id)?;
        let removed = self.store.remove(id).await?;
        debug!("removed contact {} (existed: {})", id, removed);
        Ok(())
    }

    /// Contact count plus the current timestamp, for the info page
    pub async fn info(&self) -> Result<DirectoryInfo, DirectoryError> {
        Ok(DirectoryInfo {
            count: self.store.count().await?,
            timestamp: self.clock.now(),
        })
    }

    async fn name_taken(&self, name: &str) -> Result<bool, DirectoryError> {
        let contacts = self.store.list().await?;
        Ok(contacts
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name)))
    }
}

fn parse_id(raw: &str) -> Result<ContactId, DirectoryError> {
    raw.parse().map_err(|_| DirectoryError::MalformattedId)
}

fn required(field: Option<String>, missing: DirectoryError) -> Result<String, DirectoryError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(missing),
    }
}
