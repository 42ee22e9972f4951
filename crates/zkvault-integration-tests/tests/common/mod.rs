//! Shared fixtures: one hashing context and one key pair per test binary.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zkvault_circuit::{
    setup, Groth16Prover, Groth16Verifier, PublicSignals, WithdrawVerifier,
};
use zkvault_crypto::groth16::{SerializedProof, SerializedProvingKey, SerializedVerifyingKey};
use zkvault_crypto::HashContext;
use zkvault_note::Note;
use zkvault_vault::{Vault, VaultSettings};

/// Tree depth used by every end-to-end test.
pub const LEVELS: usize = 4;

/// Root window used by every end-to-end test.
pub const ROOT_HISTORY_SIZE: usize = 3;

/// Deposit value used by every end-to-end test.
pub const DENOMINATION: u64 = 100_000_000;

pub fn ctx() -> Arc<HashContext> {
    static CTX: OnceLock<Arc<HashContext>> = OnceLock::new();
    Arc::clone(CTX.get_or_init(|| Arc::new(HashContext::new().expect("context"))))
}

pub fn keys() -> &'static (SerializedProvingKey, SerializedVerifyingKey) {
    static KEYS: OnceLock<(SerializedProvingKey, SerializedVerifyingKey)> = OnceLock::new();
    KEYS.get_or_init(|| setup(&ctx(), LEVELS).expect("setup"))
}

pub fn prover() -> Groth16Prover {
    Groth16Prover::new(ctx(), keys().0.clone(), LEVELS)
}

pub fn settings() -> VaultSettings {
    VaultSettings {
        denomination: DENOMINATION,
        levels: LEVELS,
        root_history_size: ROOT_HISTORY_SIZE,
    }
}

/// Groth16 verifier that counts how often it is consulted.
pub struct CountingVerifier {
    inner: Groth16Verifier,
    calls: AtomicUsize,
}

impl CountingVerifier {
    pub fn new() -> Self {
        Self {
            inner: Groth16Verifier::new(&keys().1).expect("verifier"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WithdrawVerifier for CountingVerifier {
    fn verify(
        &self,
        proof: &SerializedProof,
        public_signals: &PublicSignals,
    ) -> zkvault_circuit::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(proof, public_signals)
    }
}

pub fn vault() -> Vault<CountingVerifier> {
    Vault::new(ctx(), &settings(), CountingVerifier::new()).expect("vault")
}

/// Deterministic notes for a test, distinct per `seed`.
pub fn notes(seed: u64, count: usize) -> Vec<Note> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..count).map(|_| Note::generate(&mut rng)).collect()
}
