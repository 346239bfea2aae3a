//! Encrypted persistence for the credential set.
//!
//! `VaultStore` turns a `VaultRecord` into the single durable blob and
//! back: serialize to JSON, encrypt under the master key, write
//! atomically via the format layer.  Every save is a full rewrite of
//! the blob — O(total vault size) per mutation, fine for a
//! human-curated credential set.

use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::crypto::codec::{decrypt, encrypt};
use crate::crypto::keystore::MasterKey;
use crate::errors::{Result, VaultError};

use super::format;
use super::record::VaultRecord;

/// Loads and saves the encrypted vault blob at a fixed path.
pub struct VaultStore {
    /// Path to the vault blob on disk.
    path: PathBuf,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the vault blob.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and decrypt the credential set.
    ///
    /// A missing blob is a first run and yields an empty record.  A
    /// blob that fails authentication or envelope validation *also*
    /// yields an empty record: an unreadable vault is deliberately
    /// treated the same as no vault at all, so a wrong key or a
    /// corrupted file never blocks startup.  Read-side I/O errors
    /// still propagate — an unreadable disk is not "no vault yet".
    pub fn load(&self, key: &MasterKey) -> Result<VaultRecord> {
        if !self.path.exists() {
            return Ok(VaultRecord::new());
        }

        let payload = match format::read_blob(&self.path) {
            Ok(payload) => payload,
            Err(VaultError::InvalidFormat(_)) => return Ok(VaultRecord::new()),
            Err(e) => return Err(e),
        };

        let mut plaintext = match decrypt(key.as_bytes(), &payload) {
            Ok(plaintext) => plaintext,
            Err(VaultError::AuthenticationFailed) => return Ok(VaultRecord::new()),
            Err(e) => return Err(e),
        };

        let record = serde_json::from_slice(&plaintext)
            .map_err(|e| VaultError::Serialization(format!("vault record: {e}")));
        plaintext.zeroize();
        record
    }

    /// Serialize, encrypt, and persist the credential set atomically.
    pub fn save(&self, record: &VaultRecord, key: &MasterKey) -> Result<()> {
        let mut plaintext = serde_json::to_vec(record)
            .map_err(|e| VaultError::Serialization(format!("vault record: {e}")))?;

        let payload = encrypt(key.as_bytes(), &plaintext);
        plaintext.zeroize();

        format::write_blob(&self.path, &payload?)
    }
}
