//! # zkvault-vault
//!
//! The on-ledger authority: accepts fixed-denomination deposits into the
//! commitment tree and releases funds against verified withdraw proofs.
//!
//! Transitions are applied one at a time through `&mut self`, so racing
//! submitters are serialized by the owner of the [`Vault`]. Each transition
//! runs every check before touching state and either applies fully or not
//! at all.
//!
//! ## Modules
//!
//! - [`vault`]: The deposit/withdraw state machine
//! - [`spent`]: Spent nullifier hashes
//! - [`events`]: Deposit and withdrawal records
//! - [`config`]: TOML configuration
//! - [`ledger`]: String-typed surface used by external callers

pub mod config;
pub mod events;
pub mod ledger;
pub mod spent;
pub mod vault;

pub use config::{LoggingSettings, VaultConfig, VaultSettings};
pub use events::{DepositRecord, VaultEvent, WithdrawalRecord};
pub use spent::SpentSet;
pub use vault::Vault;

use zkvault_merkle::MerkleError;

/// Error types for vault transitions.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Deposit value differs from the denomination.
    #[error("invalid amount: expected {expected}, got {got}")]
    InvalidAmount {
        /// Fixed denomination.
        expected: u128,
        /// Value attached to the deposit.
        got: u128,
    },

    /// The commitment is already a leaf.
    #[error("commitment already deposited at leaf {index}")]
    DuplicateCommitment {
        /// Leaf holding the earlier deposit.
        index: u64,
    },

    /// Every leaf slot is taken.
    #[error("commitment tree is full")]
    TreeFull,

    /// The root is not in the recent root window.
    #[error("unknown merkle root")]
    UnknownRoot,

    /// The nullifier hash was already consumed.
    #[error("note already spent")]
    AlreadySpent,

    /// The verifier rejected the proof or could not read it.
    #[error("invalid withdraw proof: {0}")]
    InvalidProof(String),

    /// Malformed input at the ledger surface.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Plain value transfers are refused.
    #[error("direct transfers are not accepted")]
    DirectTransfer,

    /// Custody accounting would go negative.
    #[error("insufficient vault balance")]
    InsufficientFunds,

    /// Configuration failed to load or validate.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Tree error.
    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),
}

/// Convenience result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
