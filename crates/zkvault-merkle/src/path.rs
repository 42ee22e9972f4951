//! Authentication paths.

use serde::{Deserialize, Serialize};
use zkvault_crypto::field::decimal_vec;
use zkvault_crypto::{Fr, HashContext};

/// Sibling values and sides from a leaf up to the root.
///
/// `indices[i]` is `true` when the node on the path at level `i` is a right
/// child, so its sibling `elements[i]` goes on the left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    #[serde(with = "decimal_vec")]
    pub elements: Vec<Fr>,
    pub indices: Vec<bool>,
}

impl MerklePath {
    /// Depth of the path.
    pub fn levels(&self) -> usize {
        self.elements.len()
    }

    /// Recompute the root reached from `leaf` along this path.
    pub fn compute_root(&self, ctx: &HashContext, leaf: &Fr) -> Fr {
        self.elements
            .iter()
            .zip(&self.indices)
            .fold(*leaf, |node, (sibling, is_right)| {
                if *is_right {
                    ctx.compress(sibling, &node)
                } else {
                    ctx.compress(&node, sibling)
                }
            })
    }

    /// Leaf position encoded by the side bits.
    pub fn leaf_index(&self) -> u64 {
        self.indices
            .iter()
            .rev()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit))
    }

    /// Side bits as field elements (`0` or `1`), the form a prover consumes.
    pub fn indices_as_field(&self) -> Vec<Fr> {
        self.indices.iter().map(|bit| Fr::from(u64::from(*bit))).collect()
    }
}
