//! Groth16/BLS12-381 proving and verification infrastructure.
//!
//! Withdrawal proofs are Groth16 over BLS12-381. Keys and proofs cross crate
//! boundaries as compressed canonical bytes. Proving and verifying keys are
//! only accepted when they expose exactly the three withdraw inputs
//! `[root, nullifier_hash, recipient]`; [`PreparedVerifier`] keeps the
//! processed verification key around so a vault does not redo the pairing
//! preparation for every withdrawal.
//!
//! ## Sizes
//!
//! - Proof size: 192 bytes (compressed)
//! - Public inputs: [`WITHDRAW_PUBLIC_INPUTS`]

use std::time::Instant;

use ark_bls12_381::{Bls12_381, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::ConstraintSynthesizer;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::{CryptoRng, RngCore};

use crate::{CryptoError, Result};

/// Upper bound on a compressed Groth16/BLS12-381 proof.
pub const PROOF_SIZE: usize = 192;

/// A serialized Groth16 proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedProof {
    pub bytes: Vec<u8>,
}

impl SerializedProof {
    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex proof, with or without a `0x` prefix.
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(digits).map_err(|e| CryptoError::Serialization(e.to_string()))?;
        Ok(Self { bytes })
    }
}

/// A serialized verification key.
#[derive(Clone, Debug)]
pub struct SerializedVerifyingKey {
    pub bytes: Vec<u8>,
}

/// A serialized proving key.
#[derive(Clone, Debug)]
pub struct SerializedProvingKey {
    pub bytes: Vec<u8>,
}

/// Generate proving and verification keys for a circuit.
///
/// Circuit-specific setup with local randomness. Anyone holding the toxic
/// waste can forge proofs, so this is for tests and tooling; a deployment
/// loads keys from a ceremony.
pub fn setup<C: ConstraintSynthesizer<Fr>>(
    circuit: C,
) -> Result<(SerializedProvingKey, SerializedVerifyingKey)> {
    setup_with_rng(circuit, &mut rand::rngs::OsRng)
}

/// [`setup`] with a caller-supplied randomness source.
pub fn setup_with_rng<C, R>(
    circuit: C,
    rng: &mut R,
) -> Result<(SerializedProvingKey, SerializedVerifyingKey)>
where
    C: ConstraintSynthesizer<Fr>,
    R: RngCore + CryptoRng,
{
    let (pk, vk) = Groth16::<Bls12_381>::circuit_specific_setup(circuit, rng)
        .map_err(|e| CryptoError::Setup(e.to_string()))?;

    let mut pk_bytes = Vec::new();
    pk.serialize_compressed(&mut pk_bytes)
        .map_err(|e| CryptoError::Serialization(e.to_string()))?;

    let mut vk_bytes = Vec::new();
    vk.serialize_compressed(&mut vk_bytes)
        .map_err(|e| CryptoError::Serialization(e.to_string()))?;

    tracing::debug!(
        pk_bytes = pk_bytes.len(),
        vk_bytes = vk_bytes.len(),
        "groth16 setup complete"
    );

    Ok((
        SerializedProvingKey { bytes: pk_bytes },
        SerializedVerifyingKey { bytes: vk_bytes },
    ))
}

/// Public inputs of the withdraw relation: `[root, nullifier_hash, recipient]`.
pub const WITHDRAW_PUBLIC_INPUTS: usize = 3;

/// Public inputs in allocation order.
pub type WithdrawInputs = [Fr; WITHDRAW_PUBLIC_INPUTS];

fn check_input_count(gamma_abc_len: usize) -> Result<()> {
    let got = gamma_abc_len.saturating_sub(1);
    if got != WITHDRAW_PUBLIC_INPUTS {
        return Err(CryptoError::PublicInputCount(got));
    }
    Ok(())
}

/// Prove a withdraw circuit with OS randomness.
///
/// # Errors
///
/// - [`CryptoError::Serialization`] if the proving key does not deserialize
/// - [`CryptoError::PublicInputCount`] if the key is not for a withdraw circuit
/// - [`CryptoError::Proof`] if synthesis fails
pub fn prove_withdraw<C: ConstraintSynthesizer<Fr>>(
    circuit: C,
    proving_key: &SerializedProvingKey,
) -> Result<SerializedProof> {
    prove_withdraw_with_rng(circuit, proving_key, &mut rand::rngs::OsRng)
}

/// [`prove_withdraw`] with caller-supplied blinding randomness.
pub fn prove_withdraw_with_rng<C, R>(
    circuit: C,
    proving_key: &SerializedProvingKey,
    rng: &mut R,
) -> Result<SerializedProof>
where
    C: ConstraintSynthesizer<Fr>,
    R: RngCore + CryptoRng,
{
    let pk = ProvingKey::<Bls12_381>::deserialize_compressed(&*proving_key.bytes)
        .map_err(|e| CryptoError::Serialization(e.to_string()))?;
    check_input_count(pk.vk.gamma_abc_g1.len())?;

    let started = Instant::now();
    let proof = Groth16::<Bls12_381>::prove(&pk, circuit, rng)
        .map_err(|e| CryptoError::Proof(e.to_string()))?;

    let mut bytes = Vec::with_capacity(PROOF_SIZE);
    proof
        .serialize_compressed(&mut bytes)
        .map_err(|e| CryptoError::Serialization(e.to_string()))?;
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        bytes = bytes.len(),
        "withdraw proof serialized"
    );
    Ok(SerializedProof { bytes })
}

/// A withdraw verification key processed once for repeated verification.
#[derive(Clone)]
pub struct PreparedVerifier {
    pvk: PreparedVerifyingKey<Bls12_381>,
}

impl PreparedVerifier {
    /// Deserialize and prepare a withdraw verification key.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Serialization`] if the key does not deserialize
    /// - [`CryptoError::PublicInputCount`] if the key expects other than
    ///   [`WITHDRAW_PUBLIC_INPUTS`] inputs
    pub fn new(verifying_key: &SerializedVerifyingKey) -> Result<Self> {
        let vk = VerifyingKey::<Bls12_381>::deserialize_compressed(&*verifying_key.bytes)
            .map_err(|e| CryptoError::Serialization(e.to_string()))?;
        check_input_count(vk.gamma_abc_g1.len())?;
        Ok(Self {
            pvk: PreparedVerifyingKey::from(vk),
        })
    }

    /// Check `proof` against the withdraw public inputs.
    ///
    /// Returns `Ok(false)` for a well-formed proof that does not verify.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Serialization`] if the proof bytes are not a valid proof
    pub fn verify(&self, proof: &SerializedProof, inputs: &WithdrawInputs) -> Result<bool> {
        let proof = Proof::<Bls12_381>::deserialize_compressed(&*proof.bytes)
            .map_err(|e| CryptoError::Serialization(e.to_string()))?;
        let accepted = Groth16::<Bls12_381>::verify_with_processed_vk(&self.pvk, inputs, &proof)
            .map_err(|e| CryptoError::Proof(e.to_string()))?;
        tracing::trace!(accepted, "withdraw pairing check");
        Ok(accepted)
    }
}
