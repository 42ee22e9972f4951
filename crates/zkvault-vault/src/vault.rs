//! The deposit/withdraw state machine.

use std::collections::HashMap;
use std::sync::Arc;

use ark_ff::Zero;
use zkvault_circuit::{PublicSignals, WithdrawVerifier};
use zkvault_crypto::field::to_decimal;
use zkvault_crypto::groth16::SerializedProof;
use zkvault_crypto::{Fr, HashContext};
use zkvault_merkle::{IncrementalTree, MerkleError};

use crate::config::{VaultConfig, VaultSettings};
use crate::events::{DepositRecord, VaultEvent, WithdrawalRecord};
use crate::spent::SpentSet;
use crate::{Result, VaultError};

/// A fixed-denomination privacy vault.
///
/// Custody invariant: `balance == denomination * (deposits - withdrawals)`.
/// Funds leave only through [`Vault::withdraw`].
pub struct Vault<V: WithdrawVerifier> {
    tree: IncrementalTree,
    commitments: Vec<Fr>,
    leaf_indices: HashMap<Fr, u64>,
    spent: SpentSet,
    verifier: V,
    denomination: u128,
    balance: u128,
    credited: HashMap<Fr, u128>,
    events: Vec<VaultEvent>,
}

impl<V: WithdrawVerifier> Vault<V> {
    /// Create an empty vault.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidConfig`] if `settings` do not validate
    pub fn new(ctx: Arc<HashContext>, settings: &VaultSettings, verifier: V) -> Result<Self> {
        settings.validate()?;
        let tree = IncrementalTree::new(ctx, settings.levels, settings.root_history_size)?;
        tracing::debug!(
            levels = settings.levels,
            root_history_size = settings.root_history_size,
            denomination = settings.denomination,
            "vault created"
        );
        Ok(Self {
            tree,
            commitments: Vec::new(),
            leaf_indices: HashMap::new(),
            spent: SpentSet::new(),
            verifier,
            denomination: u128::from(settings.denomination),
            balance: 0,
            credited: HashMap::new(),
            events: Vec::new(),
        })
    }

    pub fn from_config(ctx: Arc<HashContext>, config: &VaultConfig, verifier: V) -> Result<Self> {
        Self::new(ctx, &config.vault, verifier)
    }

    /// Accept a deposit of exactly one denomination bound to `commitment`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidAmount`] unless `paid` equals the denomination
    /// - [`VaultError::DuplicateCommitment`] if the commitment is already a leaf
    /// - [`VaultError::TreeFull`] if no leaf slot is left
    pub fn deposit(&mut self, commitment: Fr, paid: u128) -> Result<DepositRecord> {
        if paid != self.denomination {
            tracing::warn!(paid, expected = self.denomination, "deposit rejected: amount");
            return Err(VaultError::InvalidAmount {
                expected: self.denomination,
                got: paid,
            });
        }
        if let Some(&index) = self.leaf_indices.get(&commitment) {
            tracing::warn!(index, "deposit rejected: duplicate commitment");
            return Err(VaultError::DuplicateCommitment { index });
        }
        let balance = self
            .balance
            .checked_add(paid)
            .ok_or_else(|| VaultError::UnsupportedInput("balance overflow".into()))?;

        let leaf_index = match self.tree.insert(commitment) {
            Ok(index) => index,
            Err(MerkleError::TreeFull { capacity }) => {
                tracing::warn!(capacity, "deposit rejected: tree full");
                return Err(VaultError::TreeFull);
            }
            Err(e) => return Err(e.into()),
        };
        self.commitments.push(commitment);
        self.leaf_indices.insert(commitment, leaf_index);
        self.balance = balance;

        let record = DepositRecord {
            commitment,
            leaf_index,
            sequence: self.next_sequence(),
        };
        self.events.push(VaultEvent::Deposit(record.clone()));
        tracing::info!(
            leaf_index,
            commitment = %to_decimal(&commitment),
            "deposit accepted"
        );
        Ok(record)
    }

    /// Release one denomination to `public_signals.recipient`.
    ///
    /// The root window and spent set are checked before the verifier runs.
    ///
    /// # Errors
    ///
    /// - [`VaultError::UnknownRoot`] if the root is not in the recent window
    /// - [`VaultError::AlreadySpent`] if the nullifier hash was consumed
    /// - [`VaultError::InvalidProof`] if verification fails or errors
    /// - [`VaultError::InsufficientFunds`] if custody accounting would go negative
    pub fn withdraw(
        &mut self,
        proof: &SerializedProof,
        public_signals: &PublicSignals,
    ) -> Result<WithdrawalRecord> {
        let PublicSignals {
            root,
            nullifier_hash,
            recipient,
        } = *public_signals;

        if !self.tree.is_known_root(&root) {
            tracing::warn!(root = %to_decimal(&root), "withdraw rejected: unknown root");
            return Err(VaultError::UnknownRoot);
        }
        if self.spent.contains(&nullifier_hash) {
            tracing::warn!(
                nullifier_hash = %to_decimal(&nullifier_hash),
                "withdraw rejected: already spent"
            );
            return Err(VaultError::AlreadySpent);
        }
        match self.verifier.verify(proof, public_signals) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("withdraw rejected: proof does not verify");
                return Err(VaultError::InvalidProof("verification failed".into()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "withdraw rejected: unreadable proof");
                return Err(VaultError::InvalidProof(e.to_string()));
            }
        }

        let balance = self
            .balance
            .checked_sub(self.denomination)
            .ok_or(VaultError::InsufficientFunds)?;
        let credit = self
            .credited
            .get(&recipient)
            .copied()
            .unwrap_or(0)
            .checked_add(self.denomination)
            .ok_or_else(|| VaultError::UnsupportedInput("recipient balance overflow".into()))?;

        self.spent.insert_checked(nullifier_hash)?;
        self.balance = balance;
        self.credited.insert(recipient, credit);

        let record = WithdrawalRecord {
            nullifier_hash,
            recipient,
            amount: self.denomination,
            sequence: self.next_sequence(),
        };
        self.events.push(VaultEvent::Withdrawal(record.clone()));
        tracing::info!(
            nullifier_hash = %to_decimal(&nullifier_hash),
            recipient = %to_decimal(&recipient),
            "withdrawal completed"
        );
        Ok(record)
    }

    /// A bare value transfer with no commitment attached. Always refused.
    pub fn receive(&mut self, value: u128) -> Result<()> {
        tracing::warn!(value, "direct transfer refused");
        Err(VaultError::DirectTransfer)
    }

    fn next_sequence(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn denomination(&self) -> u128 {
        self.denomination
    }

    pub fn levels(&self) -> usize {
        self.tree.levels()
    }

    pub fn root_history_size(&self) -> usize {
        self.tree.root_history_size()
    }

    /// Value currently held by the vault.
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Total value released to `recipient`.
    pub fn credited(&self, recipient: &Fr) -> u128 {
        self.credited.get(recipient).copied().unwrap_or(0)
    }

    pub fn commitment(&self, index: u64) -> Option<Fr> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.commitments.get(i))
            .copied()
    }

    /// Like [`Self::commitment`], with zero for unfilled slots.
    pub fn commitment_or_zero(&self, index: u64) -> Fr {
        self.commitment(index).unwrap_or_else(Fr::zero)
    }

    /// Deposited commitments in leaf order.
    pub fn commitments(&self) -> &[Fr] {
        &self.commitments
    }

    pub fn leaf_index(&self, commitment: &Fr) -> Option<u64> {
        self.leaf_indices.get(commitment).copied()
    }

    pub fn is_known_root(&self, root: &Fr) -> bool {
        self.tree.is_known_root(root)
    }

    pub fn is_spent(&self, nullifier_hash: &Fr) -> bool {
        self.spent.contains(nullifier_hash)
    }

    pub fn current_root(&self) -> Fr {
        self.tree.current_root()
    }

    pub fn deposit_count(&self) -> u64 {
        self.tree.len()
    }

    pub fn withdrawal_count(&self) -> usize {
        self.spent.len()
    }

    /// Accepted transitions in order.
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }
}
