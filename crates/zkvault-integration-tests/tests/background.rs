//! Integration test: proving off the async executor.

mod common;

use std::sync::Arc;

use common::{ctx, notes, prover, vault, DENOMINATION, LEVELS};
use zkvault_circuit::{prove_in_background, CircuitError, WithdrawWitness};
use zkvault_crypto::Fr;
use zkvault_merkle::MerkleTree;

#[tokio::test]
async fn background_proof_is_accepted() {
    let ctx = ctx();
    let mut vault = vault();
    let paid = u128::from(DENOMINATION);
    let note = notes(20, 1).remove(0);
    vault
        .deposit(note.commitment(&ctx).expect("commitment"), paid)
        .expect("deposit");

    let tree = MerkleTree::from_leaves(ctx.clone(), LEVELS, vault.commitments()).expect("rebuild");
    let witness = WithdrawWitness::for_note(&ctx, &note, &tree, Fr::from(3u64)).expect("witness");

    let task = prove_in_background(Arc::new(prover()), witness);
    let proof = task.join().await.expect("proof");
    vault
        .withdraw(&proof.proof, &proof.public_signals)
        .expect("withdraw");
    assert_eq!(vault.credited(&Fr::from(3u64)), paid);
}

#[tokio::test]
async fn concurrent_rebuilds_agree() {
    let ctx = ctx();
    let leaves: Vec<Fr> = notes(21, 6)
        .iter()
        .map(|note| note.commitment(&ctx).expect("commitment"))
        .collect();
    let leaves = Arc::new(leaves);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = ctx.clone();
            let leaves = Arc::clone(&leaves);
            tokio::task::spawn_blocking(move || {
                MerkleTree::from_leaves(ctx, LEVELS, &leaves).map(|tree| tree.root())
            })
        })
        .collect();

    let mut roots = Vec::new();
    for handle in handles {
        roots.push(handle.await.expect("join").expect("rebuild"));
    }
    assert!(roots.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn cancelled_proof_is_discarded() {
    let ctx = ctx();
    let note = notes(22, 1).remove(0);
    let leaves = vec![note.commitment(&ctx).expect("commitment")];
    let tree = MerkleTree::from_leaves(ctx.clone(), LEVELS, &leaves).expect("tree");
    let witness = WithdrawWitness::for_note(&ctx, &note, &tree, Fr::from(3u64)).expect("witness");

    let task = prove_in_background(Arc::new(prover()), witness);
    task.cancel();
    assert!(matches!(task.join().await, Err(CircuitError::Cancelled)));
}
