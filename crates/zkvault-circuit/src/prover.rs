//! Proving seam and the Groth16 prover.
//!
//! Proving is the expensive step of a withdrawal and happens entirely before
//! anything is submitted to a vault. [`prove_in_background`] moves it onto
//! the tokio blocking pool so async callers stay responsive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use zkvault_crypto::groth16::{self, SerializedProof, SerializedProvingKey, SerializedVerifyingKey};
use zkvault_crypto::HashContext;
use zkvault_merkle::check_levels;

use crate::withdraw::{check_witness, WithdrawCircuit};
use crate::witness::{PublicSignals, WithdrawWitness};
use crate::{CircuitError, Result};

/// A proof together with the public signals it was generated for.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WithdrawProof {
    /// Hex of the compressed Groth16 proof.
    #[serde(with = "proof_hex")]
    pub proof: SerializedProof,
    pub public_signals: PublicSignals,
}

mod proof_hex {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use zkvault_crypto::groth16::SerializedProof;

    pub fn serialize<S: Serializer>(proof: &SerializedProof, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&proof.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SerializedProof, D::Error> {
        let text = String::deserialize(d)?;
        SerializedProof::from_hex(&text).map_err(D::Error::custom)
    }
}

/// Produces withdraw proofs from witnesses.
pub trait WithdrawProver: Send + Sync {
    /// Prove the withdraw relation for `witness`.
    ///
    /// A witness that violates the circuit is an error, never a proof.
    fn prove(&self, witness: &WithdrawWitness) -> Result<WithdrawProof>;
}

/// Generate Groth16 keys for the withdraw circuit of depth `levels`.
///
/// Keys made here come from local randomness and are only fit for tests and
/// tooling.
///
/// # Errors
///
/// - [`CircuitError::Merkle`] if `levels` is outside `[1, 32]`
/// - [`CircuitError::Crypto`] if key generation fails
pub fn setup(
    ctx: &Arc<HashContext>,
    levels: usize,
) -> Result<(SerializedProvingKey, SerializedVerifyingKey)> {
    check_levels(levels)?;
    let keys = groth16::setup(WithdrawCircuit::blank(Arc::clone(ctx), levels))?;
    tracing::info!(levels, "withdraw circuit keys generated");
    Ok(keys)
}

/// Groth16 prover for a fixed tree depth.
pub struct Groth16Prover {
    ctx: Arc<HashContext>,
    proving_key: SerializedProvingKey,
    levels: usize,
}

impl Groth16Prover {
    pub fn new(ctx: Arc<HashContext>, proving_key: SerializedProvingKey, levels: usize) -> Self {
        Self {
            ctx,
            proving_key,
            levels,
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }
}

impl WithdrawProver for Groth16Prover {
    fn prove(&self, witness: &WithdrawWitness) -> Result<WithdrawProof> {
        if witness.levels() != self.levels {
            return Err(CircuitError::LevelsMismatch {
                expected: self.levels,
                got: witness.levels(),
            });
        }
        let circuit = WithdrawCircuit::new(Arc::clone(&self.ctx), witness);
        check_witness(circuit.clone())?;
        let proof = groth16::prove_withdraw(circuit, &self.proving_key)?;
        tracing::debug!(levels = self.levels, "withdraw proof generated");
        Ok(WithdrawProof {
            proof,
            public_signals: witness.public_signals(),
        })
    }
}

/// Handle to a proof being generated on the blocking pool.
pub struct ProvingTask {
    handle: JoinHandle<Result<WithdrawProof>>,
    cancelled: Arc<AtomicBool>,
}

impl ProvingTask {
    /// Ask the task to stop.
    ///
    /// Proving itself cannot be interrupted; a cancelled task skips proving
    /// if it has not started and discards the proof if it has.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the proof.
    ///
    /// # Errors
    ///
    /// - [`CircuitError::Cancelled`] if [`Self::cancel`] was called
    /// - [`CircuitError::Background`] if the task panicked
    /// - whatever the prover returned
    pub async fn join(self) -> Result<WithdrawProof> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(CircuitError::Cancelled),
            Err(e) => Err(CircuitError::Background(e.to_string())),
        }
    }
}

/// Run `prover` for `witness` on the tokio blocking pool.
///
/// Cancellation is cooperative: see [`ProvingTask::cancel`]. Must be called
/// from within a tokio runtime.
pub fn prove_in_background<P>(prover: Arc<P>, witness: WithdrawWitness) -> ProvingTask
where
    P: WithdrawProver + ?Sized + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    let handle = tokio::task::spawn_blocking(move || {
        if flag.load(Ordering::Acquire) {
            return Err(CircuitError::Cancelled);
        }
        let result = prover.prove(&witness);
        if flag.load(Ordering::Acquire) {
            tracing::debug!("proof discarded after cancellation");
            return Err(CircuitError::Cancelled);
        }
        result
    });
    ProvingTask { handle, cancelled }
}
