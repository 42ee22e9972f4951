//! The hashing context shared by the tree, the note scheme and the circuit.
//!
//! Built once with [`HashContext::new`] and passed by reference (usually
//! behind an `Arc`). It owns the MiMC round constants, the Pedersen generator
//! table and the empty-leaf value. Construction is the only expensive step;
//! afterwards every method is a pure function of its arguments, so one
//! context can serve any number of threads.

use ark_bls12_381::Fr;

use crate::blake3::{hash_to_field, ZERO_VALUE_TAG};
use crate::mimc::MimcSponge;
use crate::pedersen::PedersenHasher;
use crate::Result;

/// Hashing parameters for one protocol instance.
#[derive(Clone)]
pub struct HashContext {
    mimc: MimcSponge,
    pedersen: PedersenHasher,
    zero_value: Fr,
}

impl HashContext {
    /// Derive all hashing parameters.
    pub fn new() -> Result<Self> {
        let mimc = MimcSponge::new();
        let pedersen = PedersenHasher::new()?;
        let zero_value = hash_to_field(ZERO_VALUE_TAG);
        tracing::debug!("hash context initialized");
        Ok(Self {
            mimc,
            pedersen,
            zero_value,
        })
    }

    /// Two-to-one compression used for every internal tree node.
    pub fn compress(&self, left: &Fr, right: &Fr) -> Fr {
        self.mimc.hash_left_right(left, right)
    }

    /// Commitment hash of a byte string.
    pub fn commitment_hash(&self, data: &[u8]) -> Result<Fr> {
        self.pedersen.hash(data)
    }

    /// Value of an unfilled leaf slot. Deliberately not zero.
    pub fn zero_value(&self) -> Fr {
        self.zero_value
    }

    pub fn mimc(&self) -> &MimcSponge {
        &self.mimc
    }

    pub fn pedersen(&self) -> &PedersenHasher {
        &self.pedersen
    }
}
