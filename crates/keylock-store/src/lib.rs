//! Durable credential storage for the Keylock door-lock controller.
//!
//! The controller keeps three facts across power cycles: the master
//! credential, the guest credential, and whether the guest credential has
//! already been consumed. This crate provides the [`CredentialStore`]
//! abstraction over that key/value state, two implementations (in-memory
//! for tests, SQLite for real deployments), and the [`CredentialSet`]
//! snapshot the controller actually works with.
//!
//! # Write model
//!
//! Stores are write-staged: [`put`](CredentialStore::put) records a value
//! but durability is only promised after [`commit`](CredentialStore::commit).
//! This mirrors how the controller persists - it always rewrites the full
//! credential snapshot and flushes once, so a torn update can never leave
//! the guest-used flag disagreeing with the guest credential it describes.

pub mod credentials;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use credentials::CredentialSet;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};
pub use traits::CredentialStore;
