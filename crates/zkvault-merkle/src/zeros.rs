//! Roots of empty subtrees.
//!
//! `zeros[0]` is the empty-leaf value and `zeros[i] = compress(zeros[i-1], zeros[i-1])`.
//! The root of a tree with no leaves is `zeros[levels]`.

use zkvault_crypto::{Fr, HashContext};

use crate::{check_levels, Result};

/// Precomputed empty-subtree roots for heights `0..=levels`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroHashes {
    hashes: Vec<Fr>,
}

impl ZeroHashes {
    /// Compute the empty roots for a tree of `levels` levels.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::InvalidLevels`](crate::MerkleError::InvalidLevels) if
    ///   `levels` is outside `[1, 32]`
    pub fn new(ctx: &HashContext, levels: usize) -> Result<Self> {
        check_levels(levels)?;
        let mut hashes = Vec::with_capacity(levels + 1);
        let mut current = ctx.zero_value();
        hashes.push(current);
        for _ in 0..levels {
            current = ctx.compress(&current, &current);
            hashes.push(current);
        }
        Ok(Self { hashes })
    }

    /// Root of an empty subtree of the given height.
    ///
    /// Heights above the tree depth are never asked for; they fall back to
    /// the empty root of the whole tree.
    pub fn at(&self, height: usize) -> Fr {
        let top = self.hashes.len() - 1;
        self.hashes[height.min(top)]
    }

    /// Tree depth these hashes were computed for.
    pub fn levels(&self) -> usize {
        self.hashes.len() - 1
    }

    /// Root of the tree with no leaves.
    pub fn empty_root(&self) -> Fr {
        self.hashes[self.levels()]
    }

    pub fn as_slice(&self) -> &[Fr] {
        &self.hashes
    }
}
