//! Notes and their backup record.
//!
//! A [`Note`] is a bearer credential: whoever holds the pair can withdraw the
//! deposit. Both components are wiped from memory when the note is dropped,
//! and `Debug` never prints them.

use std::fmt;

use ark_ff::Zero;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;
use zkvault_crypto::field::{decimal, from_le_bytes_31, HALF_NOTE_BYTES};
use zkvault_crypto::{Fr, HashContext};

use crate::{NoteError, Result};

/// A `(nullifier, secret)` pair with both components nonzero and below `2^248`.
#[derive(Clone, PartialEq, Eq)]
pub struct Note {
    nullifier: Fr,
    secret: Fr,
}

impl Note {
    /// Build a note from existing components.
    ///
    /// # Errors
    ///
    /// - [`NoteError::ZeroNullifier`] / [`NoteError::ZeroSecret`] for a zero component
    /// - [`NoteError::Crypto`] if a component does not fit in 31 bytes
    pub fn new(nullifier: Fr, secret: Fr) -> Result<Self> {
        if nullifier.is_zero() {
            return Err(NoteError::ZeroNullifier);
        }
        if secret.is_zero() {
            return Err(NoteError::ZeroSecret);
        }
        zkvault_crypto::field::to_le_bytes_31(&nullifier)?;
        zkvault_crypto::field::to_le_bytes_31(&secret)?;
        Ok(Self { nullifier, secret })
    }

    /// Draw a fresh note: 31 random bytes per component, read little-endian.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            nullifier: random_component(rng),
            secret: random_component(rng),
        }
    }

    pub fn nullifier(&self) -> &Fr {
        &self.nullifier
    }

    pub fn secret(&self) -> &Fr {
        &self.secret
    }

    /// Commitment inserted into the tree at deposit.
    pub fn commitment(&self, ctx: &HashContext) -> Result<Fr> {
        crate::commitment(ctx, &self.nullifier, &self.secret)
    }

    /// Nullifier hash revealed at withdrawal.
    pub fn nullifier_hash(&self, ctx: &HashContext) -> Result<Fr> {
        crate::nullifier_hash(ctx, &self.nullifier)
    }

    /// Backup record holding the note and its commitment.
    pub fn to_record(&self, ctx: &HashContext) -> Result<NoteRecord> {
        Ok(NoteRecord {
            nullifier: self.nullifier,
            secret: self.secret,
            commitment: self.commitment(ctx)?,
        })
    }
}

fn random_component<R: RngCore + CryptoRng>(rng: &mut R) -> Fr {
    let mut bytes = [0u8; HALF_NOTE_BYTES];
    loop {
        rng.fill_bytes(&mut bytes);
        let value = from_le_bytes_31(&bytes);
        if !value.is_zero() {
            bytes.zeroize();
            return value;
        }
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Note { .. }")
    }
}

impl Drop for Note {
    fn drop(&mut self) {
        self.nullifier.zeroize();
        self.secret.zeroize();
    }
}

/// JSON backup of a note, printed once after a deposit.
///
/// ```json
/// { "nullifier": "…", "secret": "…", "commitment": "…" }
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(with = "decimal")]
    pub nullifier: Fr,
    #[serde(with = "decimal")]
    pub secret: Fr,
    #[serde(with = "decimal")]
    pub commitment: Fr,
}

impl NoteRecord {
    /// Recover the note, checking the stored commitment.
    ///
    /// # Errors
    ///
    /// - [`NoteError::CommitmentMismatch`] if the commitment does not belong to the note
    /// - anything [`Note::new`] returns
    pub fn into_note(self, ctx: &HashContext) -> Result<Note> {
        let note = Note::new(self.nullifier, self.secret)?;
        if note.commitment(ctx)? != self.commitment {
            tracing::warn!("note record commitment mismatch");
            return Err(NoteError::CommitmentMismatch);
        }
        Ok(note)
    }
}

impl fmt::Debug for NoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteRecord")
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}

impl Drop for NoteRecord {
    fn drop(&mut self) {
        self.nullifier.zeroize();
        self.secret.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(
            Note::new(Fr::zero(), Fr::from(1u64)),
            Err(NoteError::ZeroNullifier)
        ));
        assert!(matches!(
            Note::new(Fr::from(1u64), Fr::zero()),
            Err(NoteError::ZeroSecret)
        ));
        assert!(Note::new(Fr::from(1u64), Fr::from(2u64)).is_ok());
    }

    #[test]
    fn test_new_rejects_wide_component() {
        let wide = Fr::zero() - Fr::from(1u64);
        assert!(matches!(
            Note::new(wide, Fr::from(1u64)),
            Err(NoteError::Crypto(_))
        ));
    }

    #[test]
    fn test_generate_fits_encoding() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..16 {
            let note = Note::generate(&mut rng);
            assert!(!note.nullifier().is_zero());
            assert!(!note.secret().is_zero());
            let rebuilt = Note::new(*note.nullifier(), *note.secret()).expect("valid");
            assert_eq!(rebuilt, note);
        }
    }

    #[test]
    fn test_generate_distinct() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let a = Note::generate(&mut rng);
        let b = Note::generate(&mut rng);
        assert_ne!(a, b);
        assert_ne!(a.nullifier(), a.secret());
    }

    #[test]
    fn test_debug_redacts() {
        let note = Note::new(Fr::from(31337u64), Fr::from(4242u64)).expect("note");
        let shown = format!("{note:?}");
        assert!(!shown.contains("31337"));
        assert!(!shown.contains("4242"));
    }

    #[test]
    fn test_record_roundtrip_checks_commitment() {
        let ctx = HashContext::new().expect("context");
        let note = Note::new(Fr::from(11u64), Fr::from(22u64)).expect("note");
        let record = note.to_record(&ctx).expect("record");
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains(r#""nullifier":"11""#));
        assert!(json.contains(r#""secret":"22""#));

        let back: NoteRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.into_note(&ctx).expect("note"), note);

        let mut forged: NoteRecord = serde_json::from_str(&json).expect("deserialize");
        forged.commitment += Fr::from(1u64);
        assert!(matches!(
            forged.into_note(&ctx),
            Err(NoteError::CommitmentMismatch)
        ));
    }
}
