//! String-typed surface for callers that speak decimal and hex.
//!
//! Every value is parsed with [`parse_field`], so anything at or above the
//! field modulus is refused as [`VaultError::UnsupportedInput`] before the
//! state machine sees it.

use zkvault_circuit::{PublicSignals, WithdrawVerifier, PUBLIC_SIGNAL_COUNT};
use zkvault_crypto::field::parse_field;
use zkvault_crypto::groth16::SerializedProof;
use zkvault_crypto::Fr;

use crate::events::{DepositRecord, WithdrawalRecord};
use crate::vault::Vault;
use crate::{Result, VaultError};

fn parse(input: &str) -> Result<Fr> {
    parse_field(input).map_err(|e| VaultError::UnsupportedInput(e.to_string()))
}

impl<V: WithdrawVerifier> Vault<V> {
    /// [`Vault::deposit`] with the commitment as a decimal or `0x` hex string.
    pub fn deposit_hex(&mut self, commitment: &str, paid: u128) -> Result<DepositRecord> {
        let commitment = parse(commitment)?;
        self.deposit(commitment, paid)
    }

    /// [`Vault::withdraw`] from a hex proof and the public signals
    /// `[root, nullifier_hash, recipient]` as strings.
    ///
    /// # Errors
    ///
    /// - [`VaultError::UnsupportedInput`] for a wrong signal count or an
    ///   unparseable value
    /// - [`VaultError::InvalidProof`] for proof hex that does not decode
    /// - anything [`Vault::withdraw`] returns
    pub fn withdraw_encoded(
        &mut self,
        proof_hex: &str,
        public_signals: &[&str],
    ) -> Result<WithdrawalRecord> {
        if public_signals.len() != PUBLIC_SIGNAL_COUNT {
            return Err(VaultError::UnsupportedInput(format!(
                "expected {PUBLIC_SIGNAL_COUNT} public signals, got {}",
                public_signals.len()
            )));
        }
        let values = public_signals
            .iter()
            .map(|s| parse(s))
            .collect::<Result<Vec<_>>>()?;
        let signals = PublicSignals::from_slice(&values)
            .map_err(|e| VaultError::UnsupportedInput(e.to_string()))?;
        let proof = SerializedProof::from_hex(proof_hex)
            .map_err(|e| VaultError::InvalidProof(e.to_string()))?;
        self.withdraw(&proof, &signals)
    }

    /// Commitment at `index`, or zero for an unfilled slot.
    pub fn get_commitment(&self, index: u64) -> Fr {
        self.commitment_or_zero(index)
    }

    /// Root check for a decimal or hex root.
    ///
    /// # Errors
    ///
    /// - [`VaultError::UnsupportedInput`] if `root` is not a canonical field element
    pub fn is_known_root_str(&self, root: &str) -> Result<bool> {
        Ok(self.is_known_root(&parse(root)?))
    }

    /// Size of the recent-root window.
    pub fn root_size(&self) -> usize {
        self.root_history_size()
    }
}
