//! Master key provisioning and storage.
//!
//! The master key is a 32-byte random value kept in a single key file.
//! It is generated exactly once, on first startup; every later run
//! loads the same bytes back.  The key file is the sole access
//! credential for the vault — deleting it orphans the encrypted blob.

use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the master key in bytes (256 bits, AES-256-GCM).
pub const KEY_LEN: usize = 32;

/// A wrapper around the 32-byte master key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Provisions and loads the master key file.
pub struct KeyStore {
    /// Path to the key file on disk.
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the key file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the existing master key, or generate and persist a new one
    /// if no key file exists yet.
    ///
    /// A key file that exists but cannot be read or has the wrong
    /// length is an error, never a trigger for regeneration —
    /// regenerating would permanently orphan any existing vault.
    pub fn provision(&self) -> Result<MasterKey> {
        if self.path.exists() {
            self.load()
        } else {
            self.generate()
        }
    }

    /// Read and validate the key file.
    fn load(&self) -> Result<MasterKey> {
        let mut data = fs::read(&self.path).map_err(|e| {
            VaultError::KeyProvision(format!("failed to read {}: {e}", self.path.display()))
        })?;

        if data.len() != KEY_LEN {
            let got = data.len();
            data.zeroize();
            return Err(VaultError::KeyProvision(format!(
                "key file must be exactly {KEY_LEN} bytes, got {got}"
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&data);
        data.zeroize();
        Ok(MasterKey::new(bytes))
    }

    /// Generate a fresh random key and write it to the key file.
    fn generate(&self) -> Result<MasterKey> {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    VaultError::KeyProvision(format!("cannot create key directory: {e}"))
                })?;
            }
        }

        fs::write(&self.path, bytes)
            .map_err(|e| VaultError::KeyProvision(format!("failed to write key file: {e}")))?;

        // On Unix, restrict permissions to owner-only read/write.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| {
                VaultError::KeyProvision(format!("failed to set key file permissions: {e}"))
            })?;
        }

        Ok(MasterKey::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn provision_creates_key_file_on_first_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.key");

        let key = KeyStore::new(&path).provision().unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap().as_slice(), key.as_bytes());
    }

    #[test]
    fn provision_loads_existing_key_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.key");
        let store = KeyStore::new(&path);

        let first = store.provision().unwrap();
        let second = store.provision().unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn provision_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("vault.key");

        KeyStore::new(&path).provision().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn provision_rejects_wrong_length_key_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.key");
        fs::write(&path, [0u8; 16]).unwrap();

        let result = KeyStore::new(&path).provision();
        assert!(result.is_err());
        // The truncated file must be left in place, not overwritten.
        assert_eq!(fs::read(&path).unwrap().len(), 16);
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.key");
        KeyStore::new(&path).provision().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
