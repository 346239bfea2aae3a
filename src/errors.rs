use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Key provisioning errors ---
    #[error("Key provisioning failed: {0}")]
    KeyProvision(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    AuthenticationFailed,

    // --- Vault errors ---
    #[error("Invalid vault format: {0}")]
    InvalidFormat(String),

    #[error("Vault is locked")]
    VaultLocked,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to write vault: {0}")]
    StorageWrite(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
