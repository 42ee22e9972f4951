//! Verification seam and the Groth16 verifier.

use std::sync::Arc;

use zkvault_crypto::groth16::{PreparedVerifier, SerializedProof, SerializedVerifyingKey};
use zkvault_crypto::CryptoError;

use crate::witness::PublicSignals;
use crate::{CircuitError, Result};

/// Checks withdraw proofs against public signals.
///
/// Implementations must be pure: the answer depends only on the arguments.
pub trait WithdrawVerifier {
    /// `Ok(true)` iff `proof` attests the withdraw relation for `public_signals`.
    fn verify(&self, proof: &SerializedProof, public_signals: &PublicSignals) -> Result<bool>;
}

impl<V: WithdrawVerifier + ?Sized> WithdrawVerifier for Arc<V> {
    fn verify(&self, proof: &SerializedProof, public_signals: &PublicSignals) -> Result<bool> {
        (**self).verify(proof, public_signals)
    }
}

/// Groth16 verifier holding a prepared verification key.
#[derive(Clone)]
pub struct Groth16Verifier {
    inner: PreparedVerifier,
}

impl Groth16Verifier {
    /// Prepare a verification key of the withdraw circuit.
    ///
    /// # Errors
    ///
    /// - [`CircuitError::Crypto`] if the key does not deserialize
    /// - [`CircuitError::InvalidPublicSignals`] if the key expects a different
    ///   number of public inputs
    pub fn new(verifying_key: &SerializedVerifyingKey) -> Result<Self> {
        let inner = PreparedVerifier::new(verifying_key).map_err(|e| match e {
            CryptoError::PublicInputCount(n) => CircuitError::InvalidPublicSignals(n),
            other => CircuitError::Crypto(other),
        })?;
        Ok(Self { inner })
    }
}

impl WithdrawVerifier for Groth16Verifier {
    fn verify(&self, proof: &SerializedProof, public_signals: &PublicSignals) -> Result<bool> {
        let accepted = self.inner.verify(proof, &public_signals.to_array())?;
        tracing::debug!(accepted, "withdraw proof checked");
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::lc;
    use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
    use zkvault_crypto::groth16::setup;
    use zkvault_crypto::Fr;

    /// Knowledge of a square root of one public input.
    struct SquareRootCircuit;

    impl ConstraintSynthesizer<Fr> for SquareRootCircuit {
        fn generate_constraints(
            self,
            cs: ConstraintSystemRef<Fr>,
        ) -> std::result::Result<(), SynthesisError> {
            let root = cs.new_witness_variable(|| Ok(Fr::from(3u64)))?;
            let square = cs.new_input_variable(|| Ok(Fr::from(9u64)))?;
            cs.enforce_constraint(lc!() + root, lc!() + root, lc!() + square)
        }
    }

    #[test]
    fn test_rejects_foreign_key() {
        let (_pk, vk) = setup(SquareRootCircuit).expect("setup");
        assert!(matches!(
            Groth16Verifier::new(&vk),
            Err(CircuitError::InvalidPublicSignals(1))
        ));
    }

    #[test]
    fn test_rejects_garbage_key() {
        let vk = SerializedVerifyingKey {
            bytes: vec![0u8; 8],
        };
        assert!(matches!(
            Groth16Verifier::new(&vk),
            Err(CircuitError::Crypto(_))
        ));
    }
}
