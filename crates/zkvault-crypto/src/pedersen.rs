//! Pedersen hash on the Jubjub curve embedded in BLS12-381.
//!
//! Used as the commitment hash: it binds a note's secret material to a single
//! field element. The input bit string is split into signed 3-bit chunks
//! (Bowe-Hopwood encoding, Zcash protocol, section 5.4.1.7) and each chunk scales
//! its own generator. Every chunk contributes a nonzero multiple, so inputs of
//! different length never collide through zero padding. The output is the
//! affine x-coordinate of the resulting point, which lies in the BLS12-381
//! scalar field.
//!
//! Generators come from a ChaCha20 stream keyed by
//! `BLAKE3::derive_key("zkvault v1 pedersen-generators", "")`, so nobody knows
//! a discrete-log relation between them.

use ark_bls12_381::Fr;
use ark_crypto_primitives::crh::{bowe_hopwood, pedersen::Window, CRHScheme};
use ark_ed_on_bls12_381::EdwardsConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::blake3::{contexts, derive_key};
use crate::{CryptoError, Result};

/// Segment layout of the commitment hash: 6 segments of 32 three-bit chunks.
#[derive(Clone)]
pub struct CommitmentWindow;

impl Window for CommitmentWindow {
    const WINDOW_SIZE: usize = 32;
    const NUM_WINDOWS: usize = 6;
}

/// The Bowe-Hopwood CRH instance used for commitments.
pub type CommitmentCrh = bowe_hopwood::CRH<EdwardsConfig, CommitmentWindow>;

/// Generator table of the commitment hash.
pub type PedersenParameters = bowe_hopwood::Parameters<EdwardsConfig>;

/// Longest input the generator table covers: 6 * 32 * 3 bits.
pub const MAX_INPUT_BYTES: usize =
    CommitmentWindow::NUM_WINDOWS * CommitmentWindow::WINDOW_SIZE * 3 / 8;

/// Pedersen hasher holding the generator table.
#[derive(Clone)]
pub struct PedersenHasher {
    params: PedersenParameters,
}

impl PedersenHasher {
    /// Derive the generator table from the registered seed.
    pub fn new() -> Result<Self> {
        let seed = derive_key(contexts::PEDERSEN_GENERATORS, b"");
        let mut rng = ChaCha20Rng::from_seed(seed);
        let params =
            CommitmentCrh::setup(&mut rng).map_err(|e| CryptoError::Setup(e.to_string()))?;
        Ok(Self { params })
    }

    /// The generator table, needed to build the in-circuit gadget.
    pub fn parameters(&self) -> &PedersenParameters {
        &self.params
    }

    /// Hash `data` to the x-coordinate of its Jubjub point.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::UnsupportedInput`] if `data` is longer than [`MAX_INPUT_BYTES`]
    pub fn hash(&self, data: &[u8]) -> Result<Fr> {
        if data.len() > MAX_INPUT_BYTES {
            return Err(CryptoError::UnsupportedInput(format!(
                "pedersen input is {} bytes, maximum is {MAX_INPUT_BYTES}",
                data.len()
            )));
        }
        // Bowe-Hopwood already projects the sum onto its x-coordinate.
        CommitmentCrh::evaluate(&self.params, data).map_err(|e| CryptoError::Proof(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn test_deterministic_params() {
        let h1 = PedersenHasher::new().expect("params");
        let h2 = PedersenHasher::new().expect("params");
        assert_eq!(h1.parameters().generators, h2.parameters().generators);
        assert_eq!(h1.parameters().generators.len(), CommitmentWindow::NUM_WINDOWS);
    }

    #[test]
    fn test_hash_deterministic() {
        let hasher = PedersenHasher::new().expect("params");
        let a = hasher.hash(b"zkvault").expect("hash");
        let b = hasher.hash(b"zkvault").expect("hash");
        assert_eq!(a, b);
        assert_ne!(a, Fr::zero());
    }

    #[test]
    fn test_zero_padding_does_not_collide() {
        let hasher = PedersenHasher::new().expect("params");
        let short = hasher.hash(&[0x7b; 31]).expect("hash");
        let mut long = vec![0x7b; 31];
        long.extend_from_slice(&[0u8; 31]);
        let long = hasher.hash(&long).expect("hash");
        assert_ne!(short, long);
    }

    #[test]
    fn test_different_inputs() {
        let hasher = PedersenHasher::new().expect("params");
        let a = hasher.hash(&[1u8; 62]).expect("hash");
        let b = hasher.hash(&[2u8; 62]).expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn test_input_limit() {
        let hasher = PedersenHasher::new().expect("params");
        assert_eq!(MAX_INPUT_BYTES, 72);
        assert!(hasher.hash(&[0u8; MAX_INPUT_BYTES]).is_ok());
        assert!(hasher.hash(&[0u8; MAX_INPUT_BYTES + 1]).is_err());
    }
}
