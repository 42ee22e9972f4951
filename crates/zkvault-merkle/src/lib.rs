//! # zkvault-merkle
//!
//! Fixed-depth, append-only commitment tree over the BLS12-381 scalar field.
//!
//! Two views of the same tree live here. [`IncrementalTree`] is what a vault
//! keeps: one frontier node per level plus a bounded window of recent roots,
//! enough to append in O(depth) and answer "is this root recent?". [`MerkleTree`]
//! is what a withdrawing party rebuilds off-ledger from the ordered list of
//! deposited commitments, keeping every populated node so it can hand out
//! authentication paths. Both must produce bit-identical roots for the same
//! leaf sequence.
//!
//! Unfilled slots hold [`HashContext::zero_value`](zkvault_crypto::HashContext::zero_value),
//! and empty subtrees of every height are precomputed in [`ZeroHashes`].
//!
//! ## Modules
//!
//! - [`zeros`]: Empty-subtree roots per level
//! - [`history`]: Bounded root history window
//! - [`incremental`]: Frontier tree with root history
//! - [`tree`]: Fully materialised tree for rebuilding and path extraction
//! - [`path`]: Authentication paths

pub mod history;
pub mod incremental;
pub mod path;
pub mod tree;
pub mod zeros;

pub use history::RootHistory;
pub use incremental::IncrementalTree;
pub use path::MerklePath;
pub use tree::MerkleTree;
pub use zeros::ZeroHashes;

/// Smallest supported tree depth.
pub const MIN_LEVELS: usize = 1;

/// Largest supported tree depth.
pub const MAX_LEVELS: usize = 32;

/// Error types for tree operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MerkleError {
    /// Depth outside `[MIN_LEVELS, MAX_LEVELS]`.
    #[error("merkle tree levels must be [1, 32], got {0}")]
    InvalidLevels(usize),

    /// Every leaf slot is taken.
    #[error("merkle tree is full ({capacity} leaves)")]
    TreeFull {
        /// Number of leaf slots.
        capacity: u64,
    },

    /// A leaf index or prefix length past the inserted leaves.
    #[error("leaf index {index} out of range ({len} leaves)")]
    IndexOutOfRange {
        /// Requested index.
        index: u64,
        /// Leaves inserted so far.
        len: u64,
    },

    /// A leaf string that is not a canonical field element.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// The root history window must hold at least one root.
    #[error("root history size must be nonzero")]
    InvalidRootHistorySize,
}

/// Convenience result type for tree operations.
pub type Result<T> = std::result::Result<T, MerkleError>;

/// Validate a tree depth.
///
/// # Errors
///
/// - [`MerkleError::InvalidLevels`] if `levels` is outside `[1, 32]`
pub fn check_levels(levels: usize) -> Result<()> {
    if (MIN_LEVELS..=MAX_LEVELS).contains(&levels) {
        Ok(())
    } else {
        Err(MerkleError::InvalidLevels(levels))
    }
}

/// Number of leaf slots of a tree with `levels` levels.
pub fn capacity(levels: usize) -> u64 {
    1u64 << levels
}
