//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `Credential` and `VaultRecord` types (`record`)
//! - Binary blob envelope with atomic writes (`format`)
//! - `VaultStore` for loading and saving the encrypted blob (`store`)
//! - `VaultEngine` with CRUD operations and the auto-lock state machine
//!   (`engine`)

pub mod engine;
pub mod format;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use engine::VaultEngine;
pub use record::{Credential, VaultRecord};
pub use store::VaultStore;
