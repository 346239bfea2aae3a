//! The vault engine: in-memory credential set plus the auto-lock state
//! machine.
//!
//! The engine is the only owner of the decrypted `VaultRecord`.  Front
//! ends hold a handle to the engine and go through its operations;
//! they never see the record itself.  Every mutation persists the full
//! record before it is considered applied, so memory and disk cannot
//! diverge.
//!
//! Locking only ever wipes: once the idle deadline passes, the record
//! is zeroized and discarded, and there is no in-process path back to
//! `Unlocked` — a fresh engine must be opened (which re-reads the
//! blob from disk).

use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::crypto::keystore::{KeyStore, MasterKey};
use crate::errors::{Result, VaultError};

use super::record::{Credential, VaultRecord};
use super::store::VaultStore;

/// Lock state: the record only exists while unlocked.
enum LockState {
    Unlocked(VaultRecord),
    Locked,
}

/// CRUD + lock/unlock surface consumed by any front end.
pub struct VaultEngine {
    store: VaultStore,
    key: MasterKey,
    state: LockState,
    last_activity: Instant,
    idle_timeout: Duration,
}

impl VaultEngine {
    /// Open the engine: load and decrypt the persisted record (empty on
    /// a first run) and start unlocked with a fresh activity timestamp.
    pub fn open(store: VaultStore, key: MasterKey, idle_timeout: Duration) -> Result<Self> {
        let record = store.load(&key)?;
        Ok(Self {
            store,
            key,
            state: LockState::Unlocked(record),
            last_activity: Instant::now(),
            idle_timeout,
        })
    }

    /// Provision the master key and open the engine using paths and
    /// timeout from `settings`.  Creates the key file on first run.
    pub fn bootstrap(settings: &Settings, base_dir: &Path) -> Result<Self> {
        let key = KeyStore::new(settings.key_path(base_dir)).provision()?;
        let store = VaultStore::new(settings.vault_path(base_dir));
        Self::open(store, key, settings.idle_timeout())
    }

    /// Record user interaction, pushing the auto-lock deadline back.
    /// Valid in either state.
    pub fn activity(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Periodic idle check, pure with respect to the supplied `now` so
    /// timeouts are testable without real delays.
    ///
    /// Returns `true` when this call performed the `Unlocked -> Locked`
    /// transition (the record has been wiped), `false` otherwise.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let LockState::Unlocked(record) = &mut self.state {
            if now.duration_since(self.last_activity) > self.idle_timeout {
                record.wipe();
                self.state = LockState::Locked;
                return true;
            }
        }
        false
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked)
    }

    /// Insert or overwrite the credential for `site` and persist.
    ///
    /// All three fields must be non-empty after trimming.  The insert
    /// is rolled back if the save fails, so callers observing an error
    /// see the record exactly as it was before the call.
    pub fn add_or_update(&mut self, site: &str, username: &str, password: &str) -> Result<()> {
        // The unlock precondition comes before any input inspection.
        if matches!(self.state, LockState::Locked) {
            return Err(VaultError::VaultLocked);
        }

        let site = required_field("site", site)?;
        let username = required_field("username", username)?;
        let password = required_field("password", password)?;

        let LockState::Unlocked(record) = &mut self.state else {
            return Err(VaultError::VaultLocked);
        };

        let previous = record.insert(site.clone(), Credential { username, password });

        if let Err(e) = self.store.save(record, &self.key) {
            match previous {
                Some(prev) => record.insert(site, prev),
                None => record.remove(&site),
            };
            return Err(e);
        }

        self.activity();
        Ok(())
    }

    /// Remove the credential for `site` and persist.  An absent site is
    /// a no-op success, not an error.
    pub fn delete(&mut self, site: &str) -> Result<()> {
        let LockState::Unlocked(record) = &mut self.state else {
            return Err(VaultError::VaultLocked);
        };

        let Some(removed) = record.remove(site) else {
            // Nothing changed in memory, so there is nothing to persist.
            return Ok(());
        };

        if let Err(e) = self.store.save(record, &self.key) {
            record.insert(site.to_string(), removed);
            return Err(e);
        }

        self.activity();
        Ok(())
    }

    /// A detached snapshot of entries whose site name contains `filter`
    /// case-insensitively, in record iteration order.  Empty filter
    /// returns everything; a locked vault returns nothing.
    pub fn list(&self, filter: &str) -> Vec<(String, Credential)> {
        match &self.state {
            LockState::Unlocked(record) => record.search(filter),
            LockState::Locked => Vec::new(),
        }
    }

    /// Number of stored credentials (zero while locked).
    pub fn len(&self) -> usize {
        match &self.state {
            LockState::Unlocked(record) => record.len(),
            LockState::Locked => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trim a required field, rejecting blank input.
fn required_field(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VaultError::Validation(format!("{name} must not be empty")));
    }
    Ok(trimmed.to_string())
}
