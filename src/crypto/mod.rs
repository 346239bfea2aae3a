//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`codec`)
//! - Master key provisioning and storage (`keystore`)

pub mod codec;
pub mod keystore;

// Re-export the most commonly used items so callers can write:
//   use credvault::crypto::{encrypt, decrypt, KeyStore, MasterKey};
pub use codec::{decrypt, encrypt};
pub use keystore::{KeyStore, MasterKey};
