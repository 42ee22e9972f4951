//! Frontier tree with root history, the form a vault keeps on-ledger.
//!
//! ## Frontier
//!
//! For every level the tree remembers the most recent left child it has
//! completed (`filled_subtrees`). Appending leaf `i` walks up `levels`
//! steps: at a left position the running node is stored and paired with the
//! empty subtree, at a right position it is paired with the stored left
//! sibling. That yields the new root in `levels` compressions without
//! keeping the leaves themselves.
//!
//! ## History
//!
//! Every insertion pushes its root into a [`RootHistory`]. The empty-tree
//! root is never pushed, so a fresh tree knows no roots at all.

use std::sync::Arc;

use zkvault_crypto::{Fr, HashContext};

use crate::history::RootHistory;
use crate::zeros::ZeroHashes;
use crate::{capacity, MerkleError, Result};

/// Append-only tree keeping only the frontier and recent roots.
#[derive(Clone)]
pub struct IncrementalTree {
    ctx: Arc<HashContext>,
    zeros: ZeroHashes,
    filled_subtrees: Vec<Fr>,
    next_index: u64,
    history: RootHistory,
}

impl IncrementalTree {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::InvalidLevels`] if `levels` is outside `[1, 32]`
    /// - [`MerkleError::InvalidRootHistorySize`] if `root_history_size` is zero
    pub fn new(ctx: Arc<HashContext>, levels: usize, root_history_size: usize) -> Result<Self> {
        let zeros = ZeroHashes::new(&ctx, levels)?;
        let history = RootHistory::new(root_history_size)?;
        let filled_subtrees = zeros.as_slice()[..levels].to_vec();
        Ok(Self {
            ctx,
            zeros,
            filled_subtrees,
            next_index: 0,
            history,
        })
    }

    /// Append a leaf and record the new root. Returns the leaf index.
    ///
    /// # Errors
    ///
    /// - [`MerkleError::TreeFull`] if all `2^levels` slots are taken
    pub fn insert(&mut self, leaf: Fr) -> Result<u64> {
        let index = self.next_index;
        if index >= self.capacity() {
            return Err(MerkleError::TreeFull {
                capacity: self.capacity(),
            });
        }

        let mut position = index;
        let mut node = leaf;
        for (height, filled) in self.filled_subtrees.iter_mut().enumerate() {
            node = if position & 1 == 0 {
                *filled = node;
                self.ctx.compress(&node, &self.zeros.at(height))
            } else {
                self.ctx.compress(filled, &node)
            };
            position >>= 1;
        }

        self.history.push(node);
        self.next_index += 1;
        tracing::debug!(index, root = %node, "leaf inserted");
        Ok(index)
    }

    /// Current root; the empty-tree root before any insertion.
    pub fn current_root(&self) -> Fr {
        self.history
            .latest()
            .unwrap_or_else(|| self.zeros.empty_root())
    }

    /// Whether `candidate` is among the retained recent roots.
    pub fn is_known_root(&self, candidate: &Fr) -> bool {
        self.history.contains(candidate)
    }

    /// Index the next leaf will get.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn len(&self) -> u64 {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn is_full(&self) -> bool {
        self.next_index >= self.capacity()
    }

    pub fn levels(&self) -> usize {
        self.zeros.levels()
    }

    pub fn capacity(&self) -> u64 {
        capacity(self.levels())
    }

    pub fn root_history_size(&self) -> usize {
        self.history.capacity()
    }

    pub fn history(&self) -> &RootHistory {
        &self.history
    }

    pub fn context(&self) -> &Arc<HashContext> {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MerkleTree;
    use ark_ff::Zero;

    fn ctx() -> Arc<HashContext> {
        Arc::new(HashContext::new().expect("context"))
    }

    fn squares(n: u64) -> Vec<Fr> {
        (1..=n).map(|i| Fr::from(i * i)).collect()
    }

    #[test]
    fn test_level_bounds() {
        let ctx = ctx();
        assert!(IncrementalTree::new(Arc::clone(&ctx), 1, 10).is_ok());
        assert!(IncrementalTree::new(Arc::clone(&ctx), 32, 10).is_ok());
        assert_eq!(
            IncrementalTree::new(Arc::clone(&ctx), 0, 10).err(),
            Some(MerkleError::InvalidLevels(0))
        );
        assert_eq!(
            IncrementalTree::new(Arc::clone(&ctx), 33, 10).err(),
            Some(MerkleError::InvalidLevels(33))
        );
        assert_eq!(
            IncrementalTree::new(ctx, 10, 0).err(),
            Some(MerkleError::InvalidRootHistorySize)
        );
    }

    #[test]
    fn test_indices_increase_from_zero() {
        let mut tree = IncrementalTree::new(ctx(), 10, 100).expect("tree");
        for (expected, leaf) in [11u64, 22, 33].iter().enumerate() {
            assert_eq!(tree.insert(Fr::from(*leaf)).expect("insert"), expected as u64);
        }
        assert_eq!(tree.next_index(), 3);
    }

    #[test]
    fn test_full_after_capacity() {
        let mut tree = IncrementalTree::new(ctx(), 3, 100).expect("tree");
        for leaf in squares(8) {
            tree.insert(leaf).expect("insert");
        }
        assert!(tree.is_full());
        assert_eq!(
            tree.insert(Fr::from(1234u64)).expect_err("ninth insert"),
            MerkleError::TreeFull { capacity: 8 }
        );
        assert_eq!(tree.len(), 8);
    }

    #[test]
    fn test_roots_match_rebuild() {
        let ctx = ctx();
        let leaves = squares(10);
        let mut tree = IncrementalTree::new(Arc::clone(&ctx), 10, 100).expect("tree");
        for i in 0..leaves.len() {
            tree.insert(leaves[i]).expect("insert");
            let rebuilt =
                MerkleTree::from_leaves(Arc::clone(&ctx), 10, &leaves[..=i]).expect("rebuild");
            assert_eq!(tree.current_root(), rebuilt.root());
        }
    }

    #[test]
    fn test_roots_match_rebuild_boundary_levels() {
        let ctx = ctx();
        for levels in [1usize, 32] {
            let leaves = squares(2);
            let mut tree = IncrementalTree::new(Arc::clone(&ctx), levels, 10).expect("tree");
            for leaf in &leaves {
                tree.insert(*leaf).expect("insert");
            }
            let rebuilt =
                MerkleTree::from_leaves(Arc::clone(&ctx), levels, &leaves).expect("rebuild");
            assert_eq!(tree.current_root(), rebuilt.root());
        }
    }

    #[test]
    fn test_every_recent_root_known() {
        let ctx = ctx();
        let leaves = squares(10);
        let mut tree = IncrementalTree::new(Arc::clone(&ctx), 10, 100).expect("tree");
        let mut roots = Vec::new();
        for leaf in &leaves {
            tree.insert(*leaf).expect("insert");
            roots.push(tree.current_root());
        }
        for root in &roots {
            assert!(tree.is_known_root(root));
        }
        assert!(!tree.is_known_root(&Fr::from(1234u64)));
    }

    #[test]
    fn test_fresh_tree_knows_nothing() {
        let tree = IncrementalTree::new(ctx(), 10, 100).expect("tree");
        assert!(!tree.is_known_root(&Fr::from(1234u64)));
        assert!(!tree.is_known_root(&Fr::zero()));
        assert!(!tree.is_known_root(&tree.current_root()));
    }

    #[test]
    fn test_evicted_roots_forgotten() {
        let mut tree = IncrementalTree::new(ctx(), 4, 3).expect("tree");
        let mut roots = Vec::new();
        for leaf in squares(6) {
            tree.insert(leaf).expect("insert");
            roots.push(tree.current_root());
        }
        for root in &roots[..3] {
            assert!(!tree.is_known_root(root));
        }
        for root in &roots[3..] {
            assert!(tree.is_known_root(root));
        }
    }

    #[test]
    fn test_concurrent_rebuilds_agree() {
        let ctx = ctx();
        let leaves = Arc::new(squares(12));
        let mut tree = IncrementalTree::new(Arc::clone(&ctx), 6, 20).expect("tree");
        for leaf in leaves.iter() {
            tree.insert(*leaf).expect("insert");
        }
        let expected = tree.current_root();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                let leaves = Arc::clone(&leaves);
                std::thread::spawn(move || {
                    MerkleTree::from_leaves(ctx, 6, &leaves)
                        .expect("rebuild")
                        .root()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread"), expected);
        }
    }
}
