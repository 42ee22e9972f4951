//! Witness assembly and the public-signal vector.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;
use zkvault_crypto::field::decimal;
use zkvault_crypto::groth16::{WithdrawInputs, WITHDRAW_PUBLIC_INPUTS};
use zkvault_crypto::{Fr, HashContext};
use zkvault_merkle::MerkleTree;
use zkvault_note::Note;

use crate::{CircuitError, Result};

/// Number of public inputs of the withdraw circuit.
pub const PUBLIC_SIGNAL_COUNT: usize = WITHDRAW_PUBLIC_INPUTS;

/// Public inputs of a withdrawal, in allocation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignals {
    #[serde(with = "decimal")]
    pub root: Fr,
    #[serde(with = "decimal")]
    pub nullifier_hash: Fr,
    #[serde(with = "decimal")]
    pub recipient: Fr,
}

impl PublicSignals {
    /// `[root, nullifier_hash, recipient]`.
    pub fn to_array(&self) -> WithdrawInputs {
        [self.root, self.nullifier_hash, self.recipient]
    }

    /// Inverse of [`Self::to_array`] for an unchecked slice.
    ///
    /// # Errors
    ///
    /// - [`CircuitError::InvalidPublicSignals`] unless exactly three values are given
    pub fn from_slice(values: &[Fr]) -> Result<Self> {
        match values {
            [root, nullifier_hash, recipient] => Ok(Self {
                root: *root,
                nullifier_hash: *nullifier_hash,
                recipient: *recipient,
            }),
            _ => Err(CircuitError::InvalidPublicSignals(values.len())),
        }
    }
}

/// Full assignment for the withdraw circuit.
///
/// The note components are wiped on drop.
#[derive(Clone)]
pub struct WithdrawWitness {
    pub root: Fr,
    pub nullifier_hash: Fr,
    pub recipient: Fr,
    pub nullifier: Fr,
    pub secret: Fr,
    pub path_elements: Vec<Fr>,
    pub path_indices: Vec<Fr>,
}

impl WithdrawWitness {
    /// Assemble a witness for the note stored at `leaf_index` of a rebuilt tree.
    ///
    /// # Errors
    ///
    /// - [`CircuitError::LeafMismatch`] if that leaf is not the note's commitment
    pub fn from_tree(
        ctx: &HashContext,
        note: &Note,
        tree: &MerkleTree,
        leaf_index: u64,
        recipient: Fr,
    ) -> Result<Self> {
        let commitment = note.commitment(ctx)?;
        if tree.leaf(leaf_index) != Some(commitment) {
            return Err(CircuitError::LeafMismatch { index: leaf_index });
        }
        let path = tree.path(leaf_index)?;
        Ok(Self {
            root: tree.root(),
            nullifier_hash: note.nullifier_hash(ctx)?,
            recipient,
            nullifier: *note.nullifier(),
            secret: *note.secret(),
            path_indices: path.indices_as_field(),
            path_elements: path.elements,
        })
    }

    /// Like [`Self::from_tree`], locating the note's leaf first.
    ///
    /// # Errors
    ///
    /// - [`CircuitError::NoteNotFound`] if the commitment was never inserted
    pub fn for_note(
        ctx: &HashContext,
        note: &Note,
        tree: &MerkleTree,
        recipient: Fr,
    ) -> Result<Self> {
        let commitment = note.commitment(ctx)?;
        let index = tree
            .index_of(&commitment)
            .ok_or(CircuitError::NoteNotFound)?;
        Self::from_tree(ctx, note, tree, index, recipient)
    }

    pub fn public_signals(&self) -> PublicSignals {
        PublicSignals {
            root: self.root,
            nullifier_hash: self.nullifier_hash,
            recipient: self.recipient,
        }
    }

    /// Tree depth of the path.
    pub fn levels(&self) -> usize {
        self.path_elements.len()
    }
}

impl Drop for WithdrawWitness {
    fn drop(&mut self) {
        self.nullifier.zeroize();
        self.secret.zeroize();
    }
}
