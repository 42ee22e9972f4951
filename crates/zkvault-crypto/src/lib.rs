//! # zkvault-crypto
//!
//! Cryptographic primitives for the zkvault protocol.
//!
//! Everything here works over the BLS12-381 scalar field. The suite is fixed:
//! there is no algorithm negotiation and no process-wide hashing state. Callers
//! build a [`context::HashContext`] once and pass it by reference.
//!
//! ## Modules
//!
//! - [`blake3`]: Domain-separated BLAKE3 used to derive constants
//! - [`field`]: Field element parsing, formatting and the 31-byte note encoding
//! - [`mimc`]: MiMC sponge, the two-to-one compression hash of the commitment tree
//! - [`pedersen`]: Bowe-Hopwood Pedersen hash on Jubjub, the commitment hash
//! - [`context`]: The explicitly constructed hashing context
//! - [`groth16`]: Groth16/BLS12-381 setup, proving and verification

pub mod blake3;
pub mod context;
pub mod field;
pub mod groth16;
pub mod mimc;
pub mod pedersen;

pub use ark_bls12_381::Fr;
pub use context::HashContext;
pub use field::FieldElement;

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Malformed input to an encoding or hashing helper.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Parameter generation failed.
    #[error("parameter setup failed: {0}")]
    Setup(String),

    /// Groth16 proof generation or verification failed.
    #[error("proof error: {0}")]
    Proof(String),

    /// A Groth16 key whose circuit exposes the wrong number of public inputs.
    #[error("key expects {0} public inputs, withdraw proofs have 3")]
    PublicInputCount(usize),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
