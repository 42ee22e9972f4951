//! Fully materialised tree, rebuilt off-ledger from deposit history.
//!
//! Only populated nodes are stored: layer `h` holds the nodes covering the
//! inserted leaves, and anything to their right is the empty subtree root of
//! height `h`. A depth-32 tree with a handful of deposits therefore costs a
//! handful of nodes per level.
//!
//! Rebuilding is a pure function of `(levels, leaves)`; a [`MerkleTree`]
//! never touches shared state, so independent callers can rebuild in
//! parallel from the same leaf list.

use std::sync::Arc;

use zkvault_crypto::field::parse_field;
use zkvault_crypto::{Fr, HashContext};

use crate::path::MerklePath;
use crate::zeros::ZeroHashes;
use crate::{capacity, MerkleError, Result};

/// A commitment tree keeping every populated node.
#[derive(Clone)]
pub struct MerkleTree {
    ctx: Arc<HashContext>,
    zeros: ZeroHashes,
    layers: Vec<Vec<Fr>>,
}

impl MerkleTree {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::InvalidLevels`] if `levels` is outside `[1, 32]`
    pub fn new(ctx: Arc<HashContext>, levels: usize) -> Result<Self> {
        let zeros = ZeroHashes::new(&ctx, levels)?;
        Ok(Self {
            ctx,
            zeros,
            layers: vec![Vec::new(); levels + 1],
        })
    }

    /// Rebuild a tree from the ordered list of inserted leaves.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::InvalidLevels`] if `levels` is outside `[1, 32]`
    /// - [`MerkleError::TreeFull`] if there are more leaves than slots
    pub fn from_leaves(ctx: Arc<HashContext>, levels: usize, leaves: &[Fr]) -> Result<Self> {
        let mut tree = Self::new(ctx, levels)?;
        let slots = capacity(levels);
        if leaves.len() as u64 > slots {
            return Err(MerkleError::TreeFull { capacity: slots });
        }

        tree.layers[0] = leaves.to_vec();
        for height in 1..=levels {
            let empty = tree.zeros.at(height - 1);
            let next: Vec<Fr> = tree.layers[height - 1]
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).copied().unwrap_or(empty);
                    tree.ctx.compress(&pair[0], &right)
                })
                .collect();
            tree.layers[height] = next;
        }

        tracing::debug!(levels, leaves = leaves.len(), "merkle tree rebuilt");
        Ok(tree)
    }

    /// Rebuild a tree from leaves encoded as decimal or `0x` hex strings,
    /// the form a vault hands out commitments in.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::UnsupportedInput`] if a leaf is not a canonical field element
    /// - anything [`Self::from_leaves`] returns
    pub fn from_encoded<S: AsRef<str>>(
        ctx: Arc<HashContext>,
        levels: usize,
        leaves: &[S],
    ) -> Result<Self> {
        let parsed = leaves
            .iter()
            .enumerate()
            .map(|(index, leaf)| {
                parse_field(leaf.as_ref())
                    .map_err(|e| MerkleError::UnsupportedInput(format!("leaf {index}: {e}")))
            })
            .collect::<Result<Vec<Fr>>>()?;
        Self::from_leaves(ctx, levels, &parsed)
    }

    /// Root after only the first `count` of `leaves` were inserted.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::IndexOutOfRange`] if `count > leaves.len()`
    /// - anything [`Self::from_leaves`] returns
    pub fn historical_root(
        ctx: Arc<HashContext>,
        levels: usize,
        leaves: &[Fr],
        count: usize,
    ) -> Result<Fr> {
        let prefix = leaves.get(..count).ok_or(MerkleError::IndexOutOfRange {
            index: count as u64,
            len: leaves.len() as u64,
        })?;
        Ok(Self::from_leaves(ctx, levels, prefix)?.root())
    }

    /// Append a leaf, updating its ancestors. Returns the leaf index.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::TreeFull`] if every slot is taken
    pub fn insert(&mut self, leaf: Fr) -> Result<u64> {
        let index = self.len();
        if index >= self.capacity() {
            return Err(MerkleError::TreeFull {
                capacity: self.capacity(),
            });
        }
        self.layers[0].push(leaf);

        let mut position = index as usize;
        for height in 1..=self.levels() {
            position /= 2;
            let left = self.node(height - 1, 2 * position);
            let right = self.node(height - 1, 2 * position + 1);
            let parent = self.ctx.compress(&left, &right);
            let layer = &mut self.layers[height];
            if position < layer.len() {
                layer[position] = parent;
            } else {
                layer.push(parent);
            }
        }
        Ok(index)
    }

    /// Value of the node at `(height, position)`, empty-subtree root if unpopulated.
    pub fn node(&self, height: usize, position: usize) -> Fr {
        self.layers
            .get(height)
            .and_then(|layer| layer.get(position))
            .copied()
            .unwrap_or_else(|| self.zeros.at(height))
    }

    /// Current root.
    pub fn root(&self) -> Fr {
        self.node(self.levels(), 0)
    }

    /// Authentication path of the leaf at `index`.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::IndexOutOfRange`] if no leaf has been inserted at `index`
    pub fn path(&self, index: u64) -> Result<MerklePath> {
        if index >= self.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        let mut elements = Vec::with_capacity(self.levels());
        let mut indices = Vec::with_capacity(self.levels());
        let mut position = index as usize;
        for height in 0..self.levels() {
            elements.push(self.node(height, position ^ 1));
            indices.push(position & 1 == 1);
            position /= 2;
        }
        Ok(MerklePath { elements, indices })
    }

    /// Leaf at `index`, if inserted.
    pub fn leaf(&self, index: u64) -> Option<Fr> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.layers[0].get(i))
            .copied()
    }

    /// Index of the first leaf equal to `value`.
    pub fn index_of(&self, value: &Fr) -> Option<u64> {
        self.layers[0]
            .iter()
            .position(|leaf| leaf == value)
            .map(|i| i as u64)
    }

    /// Inserted leaves in order.
    pub fn leaves(&self) -> &[Fr] {
        &self.layers[0]
    }

    pub fn len(&self) -> u64 {
        self.layers[0].len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    pub fn levels(&self) -> usize {
        self.zeros.levels()
    }

    pub fn capacity(&self) -> u64 {
        capacity(self.levels())
    }

    pub fn zeros(&self) -> &ZeroHashes {
        &self.zeros
    }
}
