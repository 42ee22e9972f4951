//! Bounded window of recent roots.
//!
//! Holds the last `capacity` roots, newest last. Pushing into a full window
//! evicts the oldest root, which is then permanently unknown. The zero
//! element is never reported as known, even if someone manages to push it.

use std::collections::VecDeque;

use ark_ff::Zero;
use zkvault_crypto::Fr;

use crate::{MerkleError, Result};

/// Ring buffer of the most recent tree roots.
#[derive(Clone, Debug)]
pub struct RootHistory {
    roots: VecDeque<Fr>,
    capacity: usize,
}

impl RootHistory {
    /// Create an empty window holding up to `capacity` roots.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::InvalidRootHistorySize`] if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MerkleError::InvalidRootHistorySize);
        }
        Ok(Self {
            roots: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        })
    }

    /// Record a new current root, evicting the oldest if full.
    pub fn push(&mut self, root: Fr) {
        if self.roots.len() == self.capacity {
            if let Some(evicted) = self.roots.pop_front() {
                tracing::trace!(%evicted, "root evicted from history");
            }
        }
        self.roots.push_back(root);
    }

    /// Whether `candidate` is one of the retained roots.
    pub fn contains(&self, candidate: &Fr) -> bool {
        if candidate.is_zero() {
            return false;
        }
        self.roots.iter().any(|root| root == candidate)
    }

    /// The most recently pushed root.
    pub fn latest(&self) -> Option<Fr> {
        self.roots.back().copied()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained roots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Fr> {
        self.roots.iter()
    }
}
