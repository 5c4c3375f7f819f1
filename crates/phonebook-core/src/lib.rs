//! # Phonebook Core
//!
//! Contact directory behind a swappable storage backend.
//!
//! ## Features
//!
//! - **Storage backends**: process-local in-memory store or a sled-backed
//!   document store, behind one `ContactStore` trait
//! - **One validation policy**: presence and duplicate-name checks run in
//!   front of whichever backend is configured
//! - **Store-assigned ids**: monotonic, never reused
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phonebook_core::{ContactDraft, Directory, DirectoryConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let directory = Directory::new(&DirectoryConfig::default())?;
//!
//!     let created = directory
//!         .create(ContactDraft::new("New Person", "040-123456"))
//!         .await?;
//!
//!     let fetched = directory.get(&created.id.to_string()).await?;
//!     println!("{}: {}", fetched.name, fetched.number);
//!
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod directory;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use clock::{Clock, SimulatedClock, SystemClock};
pub use config::{DirectoryConfig, StorageConfig};
pub use directory::{Directory, DirectoryError};
pub use store::{create_store, ContactStore, DocumentStore, MemoryStore, StoreError};
pub use types::{Contact, ContactDraft, ContactId, DirectoryInfo};
