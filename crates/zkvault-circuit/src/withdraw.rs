//! The withdraw circuit.
//!
//! ## Constraints
//!
//! 1. `nullifier != 0`, `secret != 0`, `recipient != 0`
//! 2. `commitment = pedersen(LE31(nullifier) || LE31(secret))`
//! 3. `pedersen(LE31(nullifier)) == nullifier_hash`
//! 4. every path index is boolean and `commitment` hashes up to `root`
//! 5. `recipient` is a public input
//!
//! Public inputs are allocated first, in the order `root`, `nullifier_hash`,
//! `recipient`.

use std::sync::Arc;

use ark_bls12_381::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError, SynthesisMode,
};
use zkvault_crypto::HashContext;

use crate::gadgets::{check_path, note_bytes, pedersen_hash_var};
use crate::witness::WithdrawWitness;
use crate::{CircuitError, Result};

/// Withdraw circuit bound to a hashing context.
#[derive(Clone)]
pub struct WithdrawCircuit {
    ctx: Arc<HashContext>,
    root: Fr,
    nullifier_hash: Fr,
    recipient: Fr,
    nullifier: Fr,
    secret: Fr,
    path_elements: Vec<Fr>,
    path_indices: Vec<Fr>,
}

impl WithdrawCircuit {
    /// Circuit carrying a concrete witness, for proving.
    pub fn new(ctx: Arc<HashContext>, witness: &WithdrawWitness) -> Self {
        Self {
            ctx,
            root: witness.root,
            nullifier_hash: witness.nullifier_hash,
            recipient: witness.recipient,
            nullifier: witness.nullifier,
            secret: witness.secret,
            path_elements: witness.path_elements.clone(),
            path_indices: witness.path_indices.clone(),
        }
    }

    /// Shape-only circuit of the given depth, for key generation.
    pub fn blank(ctx: Arc<HashContext>, levels: usize) -> Self {
        Self {
            ctx,
            root: Fr::zero(),
            nullifier_hash: Fr::zero(),
            recipient: Fr::zero(),
            nullifier: Fr::zero(),
            secret: Fr::zero(),
            path_elements: vec![Fr::zero(); levels],
            path_indices: vec![Fr::zero(); levels],
        }
    }

    pub fn levels(&self) -> usize {
        self.path_elements.len()
    }
}

impl ConstraintSynthesizer<Fr> for WithdrawCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> std::result::Result<(), SynthesisError> {
        if self.path_elements.len() != self.path_indices.len() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let root = FpVar::new_input(cs.clone(), || Ok(self.root))?;
        let nullifier_hash = FpVar::new_input(cs.clone(), || Ok(self.nullifier_hash))?;
        let recipient = FpVar::new_input(cs.clone(), || Ok(self.recipient))?;

        let nullifier = FpVar::new_witness(cs.clone(), || Ok(self.nullifier))?;
        let secret = FpVar::new_witness(cs.clone(), || Ok(self.secret))?;
        let path_elements = self
            .path_elements
            .iter()
            .map(|e| FpVar::new_witness(cs.clone(), || Ok(*e)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let path_indices = self
            .path_indices
            .iter()
            .map(|i| FpVar::new_witness(cs.clone(), || Ok(*i)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let zero = FpVar::zero();
        nullifier.enforce_not_equal(&zero)?;
        secret.enforce_not_equal(&zero)?;
        recipient.enforce_not_equal(&zero)?;

        let params = self.ctx.pedersen().parameters();
        let nullifier_bytes = note_bytes(&nullifier)?;
        let secret_bytes = note_bytes(&secret)?;
        let preimage: Vec<UInt8<Fr>> = nullifier_bytes
            .iter()
            .chain(&secret_bytes)
            .cloned()
            .collect();

        let commitment = pedersen_hash_var(cs.clone(), params, &preimage)?;
        let computed_nullifier_hash = pedersen_hash_var(cs, params, &nullifier_bytes)?;
        computed_nullifier_hash.enforce_equal(&nullifier_hash)?;

        check_path(
            self.ctx.mimc(),
            &commitment,
            &path_elements,
            &path_indices,
            &root,
        )
    }
}

/// Synthesize `circuit` against its own witness and report the first
/// violated constraint.
///
/// # Errors
///
/// - [`CircuitError::Synthesis`] if constraint generation fails outright
/// - [`CircuitError::Unsatisfied`] if any constraint does not hold
pub fn check_witness(circuit: WithdrawCircuit) -> Result<()> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit
        .generate_constraints(cs.clone())
        .map_err(|e| CircuitError::Synthesis(e.to_string()))?;
    let satisfied = cs
        .is_satisfied()
        .map_err(|e| CircuitError::Synthesis(e.to_string()))?;
    if !satisfied {
        let which = cs
            .which_is_unsatisfied()
            .map_err(|e| CircuitError::Synthesis(e.to_string()))?
            .unwrap_or_else(|| "unknown constraint".to_string());
        tracing::warn!(constraint = %which, "withdraw witness rejected");
        return Err(CircuitError::Unsatisfied(which));
    }
    Ok(())
}

/// Number of constraints of the circuit at the given depth.
pub fn constraint_count(ctx: Arc<HashContext>, levels: usize) -> Result<usize> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_mode(SynthesisMode::Setup);
    WithdrawCircuit::blank(ctx, levels)
        .generate_constraints(cs.clone())
        .map_err(|e| CircuitError::Synthesis(e.to_string()))?;
    Ok(cs.num_constraints())
}
