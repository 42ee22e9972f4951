//! Records emitted by accepted transitions.

use serde::{Deserialize, Serialize};
use zkvault_crypto::field::decimal;
use zkvault_crypto::Fr;

/// An accepted deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    #[serde(with = "decimal")]
    pub commitment: Fr,
    pub leaf_index: u64,
    /// Position in the vault's event log.
    pub sequence: u64,
}

/// A completed withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    #[serde(with = "decimal")]
    pub nullifier_hash: Fr,
    #[serde(with = "decimal")]
    pub recipient: Fr,
    pub amount: u128,
    pub sequence: u64,
}

/// Entry of the ordered event log.
///
/// Scanning the `Deposit` entries in order yields the leaf list a
/// withdrawing party needs to rebuild the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultEvent {
    Deposit(DepositRecord),
    Withdrawal(WithdrawalRecord),
}

impl VaultEvent {
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Deposit(record) => record.sequence,
            Self::Withdrawal(record) => record.sequence,
        }
    }
}
