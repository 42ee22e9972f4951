//! # zkvault-circuit
//!
//! The withdraw relation as an R1CS circuit, and the prover/verifier seams a
//! vault talks to.
//!
//! A valid witness shows, for public `(root, nullifier_hash, recipient)`, that
//! the prover knows a nonzero `(nullifier, secret)` whose commitment sits in a
//! tree with that root, and that `nullifier_hash` belongs to the same
//! nullifier. `recipient` is only required to be nonzero; being a public
//! input is what binds it to the proof.
//!
//! Public inputs are allocated in the order `[root, nullifier_hash,
//! recipient]`. Provers and verifiers exchange them as [`PublicSignals`], which
//! fixes that order in one place.
//!
//! ## Modules
//!
//! - [`gadgets`]: In-circuit MiMC, Pedersen and Merkle path gadgets
//! - [`witness`]: Witness assembly and public signals
//! - [`withdraw`]: The withdraw circuit and witness checking
//! - [`prover`]: Proving seam, Groth16 prover, background proving
//! - [`verifier`]: Verification seam and Groth16 verifier

pub mod gadgets;
pub mod prover;
pub mod verifier;
pub mod withdraw;
pub mod witness;

pub use prover::{prove_in_background, setup, Groth16Prover, ProvingTask, WithdrawProof, WithdrawProver};
pub use verifier::{Groth16Verifier, WithdrawVerifier};
pub use withdraw::{check_witness, WithdrawCircuit};
pub use witness::{PublicSignals, WithdrawWitness, PUBLIC_SIGNAL_COUNT};

use zkvault_crypto::CryptoError;
use zkvault_merkle::MerkleError;
use zkvault_note::NoteError;

/// Error types for circuit, proving and verification operations.
#[derive(Debug, thiserror::Error)]
pub enum CircuitError {
    /// The witness violates a constraint.
    #[error("witness does not satisfy the withdraw circuit: {0}")]
    Unsatisfied(String),

    /// Constraint generation itself failed (e.g. inverting zero).
    #[error("constraint synthesis failed: {0}")]
    Synthesis(String),

    /// The note's commitment is not a leaf of the given tree.
    #[error("note commitment not found in tree")]
    NoteNotFound,

    /// The leaf at the given index is not the note's commitment.
    #[error("leaf {index} does not hold the note commitment")]
    LeafMismatch {
        /// Leaf index that was checked.
        index: u64,
    },

    /// Witness depth differs from the circuit depth.
    #[error("witness has {got} levels, circuit expects {expected}")]
    LevelsMismatch {
        /// Depth the keys were generated for.
        expected: usize,
        /// Depth of the witness path.
        got: usize,
    },

    /// A public-signal vector of the wrong length.
    #[error("expected 3 public signals, got {0}")]
    InvalidPublicSignals(usize),

    /// Proving was cancelled before a proof was handed out.
    #[error("proving cancelled")]
    Cancelled,

    /// The background proving task failed to complete.
    #[error("background proving failed: {0}")]
    Background(String),

    /// Cryptographic error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Note error.
    #[error("note error: {0}")]
    Note(#[from] NoteError),

    /// Tree error.
    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),
}

/// Convenience result type for circuit operations.
pub type Result<T> = std::result::Result<T, CircuitError>;
