//! Spent nullifier hashes.
//!
//! Exact membership: unlike a Bloom filter this set has no false positives,
//! so an honest note can never be refused as spent.

use std::collections::HashSet;

use zkvault_crypto::Fr;

use crate::{Result, VaultError};

/// Grow-only set of consumed nullifier hashes.
#[derive(Clone, Debug, Default)]
pub struct SpentSet {
    inner: HashSet<Fr>,
}

impl SpentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, nullifier_hash: &Fr) -> bool {
        self.inner.contains(nullifier_hash)
    }

    /// Mark a nullifier hash spent, refusing one already present.
    ///
    /// # Errors
    ///
    /// - [`VaultError::AlreadySpent`] if the hash is already in the set
    pub fn insert_checked(&mut self, nullifier_hash: Fr) -> Result<()> {
        if !self.inner.insert(nullifier_hash) {
            return Err(VaultError::AlreadySpent);
        }
        Ok(())
    }

    /// Number of spent notes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
