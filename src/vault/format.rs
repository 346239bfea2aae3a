//! Binary vault blob envelope and atomic writes.
//!
//! A `.dat` vault file has this layout:
//!
//! ```text
//! [CVLT: 4 bytes][version: 1 byte][nonce + ciphertext + auth tag]
//! ```
//!
//! - **Magic** (`CVLT`): identifies the file as a credvault blob.
//! - **Version**: format version (currently `1`).
//! - **Payload**: the AES-256-GCM output from `crypto::codec` — the
//!   auth tag already covers the whole credential set, so the envelope
//!   needs no separate integrity field.

use std::fs;
use std::path::Path;

use crate::errors::{Result, VaultError};

/// Magic bytes at the start of every vault blob.
const MAGIC: &[u8; 4] = b"CVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version).
const PREFIX_LEN: usize = 5;

/// Write the encrypted payload to disk **atomically**.
///
/// 1. Prefix the payload with magic + version.
/// 2. Write to a temp file in the same directory.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures a crash mid-write leaves either the old or the
/// new blob intact, never a truncated one.
pub fn write_blob(path: &Path, payload: &[u8]) -> Result<()> {
    let mut buf = Vec::with_capacity(PREFIX_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.push(CURRENT_VERSION);
    buf.extend_from_slice(payload);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                VaultError::StorageWrite(format!("cannot create vault directory: {e}"))
            })?;
        }
    }

    // The temp file is in the same directory so rename is guaranteed
    // to be atomic on the same filesystem.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, &buf)
        .map_err(|e| VaultError::StorageWrite(format!("failed to write vault blob: {e}")))?;
    fs::rename(&tmp_path, path)
        .map_err(|e| VaultError::StorageWrite(format!("failed to replace vault blob: {e}")))?;

    Ok(())
}

/// Read a vault blob from disk, validate the envelope, and return the
/// encrypted payload.
pub fn read_blob(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path)?;

    if data.len() < PREFIX_LEN {
        return Err(VaultError::InvalidFormat(
            "file too small to be a valid vault blob".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(VaultError::InvalidFormat(
            "missing CVLT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(VaultError::InvalidFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    Ok(data[PREFIX_LEN..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_returns_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");

        write_blob(&path, b"payload bytes").unwrap();
        assert_eq!(read_blob(&path).unwrap(), b"payload bytes");
    }

    #[test]
    fn write_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("vault.dat");

        write_blob(&path, b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn rewrite_replaces_previous_blob() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");

        write_blob(&path, b"old").unwrap();
        write_blob(&path, b"new").unwrap();
        assert_eq!(read_blob(&path).unwrap(), b"new");

        // No temp file left behind.
        assert!(!dir.path().join(".vault.dat.tmp").exists());
    }

    #[test]
    fn read_rejects_bad_magic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, b"XXXX\x01payload").unwrap();

        let result = read_blob(&path);
        assert!(matches!(result, Err(VaultError::InvalidFormat(_))));
    }

    #[test]
    fn read_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, b"CVLT\x09payload").unwrap();

        let result = read_blob(&path);
        assert!(matches!(result, Err(VaultError::InvalidFormat(_))));
    }

    #[test]
    fn read_rejects_truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, b"CV").unwrap();

        let result = read_blob(&path);
        assert!(matches!(result, Err(VaultError::InvalidFormat(_))));
    }
}
