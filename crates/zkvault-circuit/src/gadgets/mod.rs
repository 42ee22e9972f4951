//! In-circuit counterparts of the native hashes.
//!
//! Each gadget computes exactly what its native twin in `zkvault-crypto`
//! computes; the tests here check that equality on concrete values.

pub mod merkle;
pub mod mimc;
pub mod pedersen;

pub use merkle::check_path;
pub use mimc::{hash_left_right_var, permute_var};
pub use pedersen::{note_bytes, pedersen_hash_var};
