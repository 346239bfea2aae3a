//! Credential and VaultRecord types held in memory while unlocked.
//!
//! `VaultRecord` serializes transparently as a JSON object mapping site
//! names to credentials, e.g. `{"example.com": {"username": "alice",
//! "password": "pw"}}`.  That object is the plaintext the vault blob
//! encrypts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A username/password pair stored for one site.
///
/// Immutable once constructed — updates replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// The decrypted credential set: site name -> credential.
///
/// A `BTreeMap` keeps iteration deterministic (sorted by site), which
/// is all listings need — insertion order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultRecord {
    entries: BTreeMap<String, Credential>,
}

impl VaultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, site: &str) -> Option<&Credential> {
        self.entries.get(site)
    }

    pub fn contains_site(&self, site: &str) -> bool {
        self.entries.contains_key(site)
    }

    /// Insert or overwrite the credential for `site`, returning the
    /// previous credential if one existed.
    pub fn insert(&mut self, site: String, credential: Credential) -> Option<Credential> {
        self.entries.insert(site, credential)
    }

    /// Remove the credential for `site`, returning it if present.
    pub fn remove(&mut self, site: &str) -> Option<Credential> {
        self.entries.remove(site)
    }

    /// Entries whose site name contains `filter` case-insensitively,
    /// cloned into a detached snapshot in iteration order.  An empty
    /// filter matches everything.
    pub fn search(&self, filter: &str) -> Vec<(String, Credential)> {
        let needle = filter.to_lowercase();
        self.entries
            .iter()
            .filter(|(site, _)| site.to_lowercase().contains(&needle))
            .map(|(site, cred)| (site.clone(), cred.clone()))
            .collect()
    }

    /// Zeroize every credential and clear the map.
    ///
    /// Site names are map keys and cannot be overwritten in place; the
    /// secrets they guard (usernames and passwords) are.
    pub fn wipe(&mut self) {
        for credential in self.entries.values_mut() {
            credential.zeroize();
        }
        self.entries.clear();
    }
}
