//! Domain-separated BLAKE3 for deriving public protocol constants.
//!
//! BLAKE3 never touches note material directly. It only seeds the
//! nothing-up-my-sleeve constants of the in-circuit hashes: MiMC round
//! constants, Pedersen generators and the empty-leaf value of the tree.
//!
//! ## Context Strings
//!
//! Every derivation uses one of the registered context strings in
//! [`contexts`]. Unregistered context strings are a protocol violation.

use ark_bls12_381::Fr;
use ark_ff::PrimeField;

/// Registered BLAKE3 context strings.
pub mod contexts {
    pub const MIMC_ROUND_CONSTANTS: &str = "zkvault v1 mimc-round-constants";
    pub const PEDERSEN_GENERATORS: &str = "zkvault v1 pedersen-generators";

    /// All registered context strings.
    pub const ALL_CONTEXTS: &[&str] = &[MIMC_ROUND_CONSTANTS, PEDERSEN_GENERATORS];
}

/// Tag hashed into the value of an unfilled tree leaf.
pub const ZERO_VALUE_TAG: &[u8] = b"zkvault-classic";

/// Compute BLAKE3 hash of the input data.
pub fn hash(data: &[u8]) -> [u8; 32] {
    *::blake3::hash(data).as_bytes()
}

/// Derive 32 bytes using BLAKE3's built-in key derivation mode.
///
/// # Arguments
///
/// * `context` - A registered context string (must start with "zkvault v1 ")
/// * `key_material` - The input key material
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut hasher = ::blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    let hash = hasher.finalize();
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Hash arbitrary bytes and reduce the digest into the scalar field.
pub fn hash_to_field(data: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(&hash(data))
}

/// Derive the `index`-th field constant under a registered context.
///
/// `constant_i = BLAKE3::derive_key(context, LE64(i)) mod r`
pub fn derive_field(context: &str, index: u64) -> Fr {
    Fr::from_le_bytes_mod_order(&derive_key(context, &index.to_le_bytes()))
}
