//! Merkle path gadget.

use ark_bls12_381::Fr;
use ark_ff::One;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;
use zkvault_crypto::mimc::MimcSponge;

use super::mimc::hash_left_right_var;

/// Constrain `leaf` to hash up to `root` along `(elements, indices)`.
///
/// Each index is constrained boolean (`i * (i - 1) = 0`). The pair fed to the
/// compression is `(node, sibling)` when the index is 0 and `(sibling, node)`
/// when it is 1, selected arithmetically:
///
/// ```text
/// left  = node    + i * (sibling - node)
/// right = sibling - i * (sibling - node)
/// ```
pub fn check_path(
    mimc: &MimcSponge,
    leaf: &FpVar<Fr>,
    elements: &[FpVar<Fr>],
    indices: &[FpVar<Fr>],
    root: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    if elements.len() != indices.len() {
        return Err(SynthesisError::Unsatisfiable);
    }
    let mut node = leaf.clone();
    for (sibling, index) in elements.iter().zip(indices) {
        index.mul_equals(&(index - Fr::one()), &FpVar::zero())?;

        let swap = index * &(sibling - &node);
        let left = &node + &swap;
        let right = sibling - &swap;
        node = hash_left_right_var(mimc, &left, &right)?;
    }
    node.enforce_equal(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};
    use zkvault_crypto::HashContext;
    use zkvault_merkle::MerkleTree;

    fn alloc(cs: &ConstraintSystemRef<Fr>, values: &[Fr]) -> Vec<FpVar<Fr>> {
        values
            .iter()
            .map(|v| FpVar::new_witness(cs.clone(), || Ok(*v)).expect("alloc"))
            .collect()
    }

    fn setup() -> (Arc<HashContext>, MerkleTree) {
        let ctx = Arc::new(HashContext::new().expect("context"));
        let leaves: Vec<Fr> = (1..=5u64).map(Fr::from).collect();
        let tree = MerkleTree::from_leaves(Arc::clone(&ctx), 3, &leaves).expect("tree");
        (ctx, tree)
    }

    fn satisfied(ctx: &HashContext, leaf: Fr, elements: &[Fr], indices: &[Fr], root: Fr) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let leaf = FpVar::new_witness(cs.clone(), || Ok(leaf)).expect("alloc");
        let root = FpVar::new_input(cs.clone(), || Ok(root)).expect("alloc");
        let elements = alloc(&cs, elements);
        let indices = alloc(&cs, indices);
        check_path(ctx.mimc(), &leaf, &elements, &indices, &root).expect("synthesize");
        cs.is_satisfied().expect("checked")
    }

    #[test]
    fn test_valid_paths() {
        let (ctx, tree) = setup();
        for index in 0..5u64 {
            let path = tree.path(index).expect("path");
            let leaf = tree.leaf(index).expect("leaf");
            assert!(satisfied(
                &ctx,
                leaf,
                &path.elements,
                &path.indices_as_field(),
                tree.root()
            ));
        }
    }

    #[test]
    fn test_non_boolean_index_rejected() {
        let (ctx, tree) = setup();
        let path = tree.path(1).expect("path");
        let mut indices = path.indices_as_field();
        indices[0] = Fr::from(2u64);
        assert!(!satisfied(
            &ctx,
            tree.leaf(1).expect("leaf"),
            &path.elements,
            &indices,
            tree.root()
        ));
    }

    #[test]
    fn test_flipped_index_rejected() {
        let (ctx, tree) = setup();
        let path = tree.path(1).expect("path");
        let mut indices = path.indices_as_field();
        indices[1] = Fr::one() - indices[1];
        assert!(!satisfied(
            &ctx,
            tree.leaf(1).expect("leaf"),
            &path.elements,
            &indices,
            tree.root()
        ));
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let (ctx, _) = setup();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let leaf = FpVar::new_witness(cs.clone(), || Ok(Fr::from(1u64))).expect("alloc");
        let elements = alloc(&cs, &[Fr::from(1u64), Fr::from(2u64)]);
        let indices = alloc(&cs, &[Fr::from(0u64)]);
        assert!(check_path(ctx.mimc(), &leaf, &elements, &indices, &leaf).is_err());
    }
}
