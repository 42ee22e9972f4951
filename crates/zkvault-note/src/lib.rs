//! # zkvault-note
//!
//! The note scheme: what a depositor keeps, and the two public values derived
//! from it.
//!
//! A note is a `(nullifier, secret)` pair of nonzero field elements below
//! `2^248`. Each component is encoded as 31 little-endian bytes and fed to the
//! Pedersen commitment hash:
//!
//! ```text
//! commitment     = pedersen(LE31(nullifier) || LE31(secret))
//! nullifier_hash = pedersen(LE31(nullifier))
//! ```
//!
//! The commitment goes into the tree at deposit time. The nullifier hash is
//! revealed at withdrawal and marks the note spent. The two inputs differ in
//! length, and the Bowe-Hopwood encoding never collides across lengths, so
//! neither value reveals the other.
//!
//! The free functions below compute the scheme for any inputs that fit the
//! encoding, including zero. Rejecting zero components is the job of
//! [`Note::new`] and of the withdraw circuit.
//!
//! ## Modules
//!
//! - [`note`]: The note type, random generation and the JSON backup record

pub mod note;

pub use note::{Note, NoteRecord};

use zeroize::Zeroize;
use zkvault_crypto::field::to_le_bytes_31;
use zkvault_crypto::{CryptoError, Fr, HashContext};

/// Error types for note operations.
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// The nullifier is zero.
    #[error("note nullifier must be nonzero")]
    ZeroNullifier,

    /// The secret is zero.
    #[error("note secret must be nonzero")]
    ZeroSecret,

    /// A stored commitment does not match the one derived from the note.
    #[error("commitment does not match note")]
    CommitmentMismatch,

    /// Encoding or hashing failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Convenience result type for note operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Commitment of a `(nullifier, secret)` pair.
///
/// # Errors
///
/// - [`NoteError::Crypto`] if either component does not fit in 31 bytes
pub fn commitment(ctx: &HashContext, nullifier: &Fr, secret: &Fr) -> Result<Fr> {
    let mut preimage = [0u8; 62];
    preimage[..31].copy_from_slice(&to_le_bytes_31(nullifier)?);
    preimage[31..].copy_from_slice(&to_le_bytes_31(secret)?);
    let out = ctx.commitment_hash(&preimage);
    preimage.zeroize();
    out.map_err(NoteError::from)
}

/// Public nullifier hash revealed when the note is spent.
///
/// # Errors
///
/// - [`NoteError::Crypto`] if the nullifier does not fit in 31 bytes
pub fn nullifier_hash(ctx: &HashContext, nullifier: &Fr) -> Result<Fr> {
    let mut preimage = to_le_bytes_31(nullifier)?;
    let out = ctx.commitment_hash(&preimage);
    preimage.zeroize();
    out.map_err(NoteError::from)
}
