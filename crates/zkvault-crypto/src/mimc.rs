//! MiMC sponge on the BLS12-381 scalar field.
//!
//! The two-to-one compression function of the commitment tree. It is cheap
//! inside a Groth16 circuit (three multiplications per round), which is why
//! the tree does not use BLAKE3.
//!
//! ## Parameters
//!
//! - Field: BLS12-381 scalar field
//! - Construction: Feistel permutation inside a sponge (rate 1, capacity 1)
//! - Rounds: 220
//! - S-box: x^5
//! - Key: 0
//! - Round constants: `c_0 = c_219 = 0`, otherwise
//!   `BLAKE3::derive_key("zkvault v1 mimc-round-constants", LE64(i)) mod r`

use ark_bls12_381::Fr;
use ark_ff::Zero;

use crate::blake3::{contexts, derive_field};

/// Number of Feistel rounds per permutation.
pub const MIMC_ROUNDS: usize = 220;

/// MiMC sponge parameters.
#[derive(Clone, Debug)]
pub struct MimcSponge {
    round_constants: Vec<Fr>,
}

/// Generate the round constants deterministically.
fn generate_round_constants() -> Vec<Fr> {
    (0..MIMC_ROUNDS)
        .map(|i| {
            if i == 0 || i == MIMC_ROUNDS - 1 {
                Fr::zero()
            } else {
                derive_field(contexts::MIMC_ROUND_CONSTANTS, i as u64)
            }
        })
        .collect()
}

/// Apply the S-box (x^5) to a field element.
fn sbox(x: Fr) -> Fr {
    let x2 = x * x;
    let x4 = x2 * x2;
    x4 * x
}

impl MimcSponge {
    /// Build the sponge with the protocol round constants.
    pub fn new() -> Self {
        Self {
            round_constants: generate_round_constants(),
        }
    }

    /// The round constants, one per Feistel round.
    pub fn round_constants(&self) -> &[Fr] {
        &self.round_constants
    }

    /// One Feistel permutation of the sponge state `(xl, xr)` under `key`.
    ///
    /// Every round but the last swaps the branches; the last round only
    /// updates the right branch.
    pub fn permute(&self, mut xl: Fr, mut xr: Fr, key: Fr) -> (Fr, Fr) {
        let last = self.round_constants.len() - 1;
        for (i, c) in self.round_constants.iter().enumerate() {
            let t = xl + key + c;
            let t5 = sbox(t);
            if i < last {
                let next_xl = xr + t5;
                xr = xl;
                xl = next_xl;
            } else {
                xr += t5;
            }
        }
        (xl, xr)
    }

    /// Absorb `inputs` one element at a time and squeeze a single output.
    pub fn multi_hash(&self, inputs: &[Fr], key: Fr) -> Fr {
        let mut xl = Fr::zero();
        let mut xr = Fr::zero();
        for input in inputs {
            xl += input;
            (xl, xr) = self.permute(xl, xr, key);
        }
        xl
    }

    /// Compress two tree nodes into their parent.
    pub fn hash_left_right(&self, left: &Fr, right: &Fr) -> Fr {
        self.multi_hash(&[*left, *right], Fr::zero())
    }
}

impl Default for MimcSponge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;

    #[test]
    fn test_round_constants_shape() {
        let mimc = MimcSponge::new();
        let c = mimc.round_constants();
        assert_eq!(c.len(), MIMC_ROUNDS);
        assert_eq!(c[0], Fr::zero());
        assert_eq!(c[MIMC_ROUNDS - 1], Fr::zero());
        assert_ne!(c[1], Fr::zero());
        assert_ne!(c[1], c[2]);
    }

    #[test]
    fn test_known_answers() {
        let mimc = MimcSponge::new();
        let cases = [
            (
                0u64,
                0u64,
                "14191776337751416788675983004588780161763457828449327651503296559783286474069",
            ),
            (
                1,
                2,
                "17332039195025978649705395504028277149783046951939133347514582878904406910150",
            ),
            (
                2,
                1,
                "26978612477951900990727059639980738479694112835186227233416509275903551438839",
            ),
        ];
        for (left, right, expected) in cases {
            let got = mimc.hash_left_right(&Fr::from(left), &Fr::from(right));
            assert_eq!(crate::field::to_decimal(&got), expected, "hash({left}, {right})");
        }
    }

    #[test]
    fn test_hash_deterministic() {
        let mimc = MimcSponge::new();
        let h1 = mimc.hash_left_right(&Fr::from(1234u64), &Fr::from(4567u64));
        let h2 = MimcSponge::new().hash_left_right(&Fr::from(1234u64), &Fr::from(4567u64));
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_noncommutative() {
        let mimc = MimcSponge::new();
        let h1 = mimc.hash_left_right(&Fr::from(1u64), &Fr::from(2u64));
        let h2 = mimc.hash_left_right(&Fr::from(2u64), &Fr::from(1u64));
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_hash_extreme_inputs() {
        let mimc = MimcSponge::new();
        let max = Fr::zero() - Fr::one();
        let h = mimc.hash_left_right(&Fr::zero(), &max);
        assert_ne!(h, Fr::zero());
        assert_ne!(h, mimc.hash_left_right(&Fr::zero(), &Fr::zero()));
    }

    #[test]
    fn test_multi_hash_matches_manual_absorb() {
        let mimc = MimcSponge::new();
        let (l, r) = (Fr::from(11u64), Fr::from(22u64));
        let (xl, xr) = mimc.permute(l, Fr::zero(), Fr::zero());
        let (xl, _) = mimc.permute(xl + r, xr, Fr::zero());
        assert_eq!(xl, mimc.hash_left_right(&l, &r));
    }

    #[test]
    fn test_sbox() {
        assert_eq!(sbox(Fr::from(3u64)), Fr::from(243u64));
    }
}
