//! Pedersen commitment gadget and the 31-byte note encoding.

use ark_bls12_381::Fr;
use ark_crypto_primitives::crh::bowe_hopwood::constraints::{CRHGadget, ParametersVar};
use ark_crypto_primitives::crh::CRHSchemeGadget;
use ark_ed_on_bls12_381::constraints::FqVar;
use ark_ed_on_bls12_381::EdwardsConfig;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use zkvault_crypto::field::HALF_NOTE_BYTES;
use zkvault_crypto::pedersen::{CommitmentCrh, CommitmentWindow, PedersenParameters};

/// Bits kept from a note component.
const HALF_NOTE_BITS: usize = HALF_NOTE_BYTES * 8;

type CommitmentGadget = CRHGadget<EdwardsConfig, FqVar>;

/// Little-endian 31-byte encoding of a note component.
///
/// Decomposes `value` into its canonical bits and constrains every bit from
/// 248 up to be zero, so the encoding is exactly the native
/// [`to_le_bytes_31`](zkvault_crypto::field::to_le_bytes_31).
pub fn note_bytes(value: &FpVar<Fr>) -> Result<Vec<UInt8<Fr>>, SynthesisError> {
    let bits = value.to_bits_le()?;
    for bit in bits.iter().skip(HALF_NOTE_BITS) {
        bit.enforce_equal(&Boolean::constant(false))?;
    }
    Ok(bits[..HALF_NOTE_BITS]
        .chunks(8)
        .map(UInt8::from_bits_le)
        .collect())
}

/// Pedersen hash of `bytes`, returning the x-coordinate.
pub fn pedersen_hash_var(
    cs: ConstraintSystemRef<Fr>,
    params: &PedersenParameters,
    bytes: &[UInt8<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    let params_var = ParametersVar::<EdwardsConfig, CommitmentWindow>::new_constant(cs, params)?;
    <CommitmentGadget as CRHSchemeGadget<CommitmentCrh, Fr>>::evaluate(&params_var, bytes)
}
