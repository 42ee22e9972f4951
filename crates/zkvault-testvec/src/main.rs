//! Test vector generator for the zkvault protocol.
//!
//! Writes `tests/fixtures/test_vectors.json` (next to this crate's manifest)
//! with the zero value, tree compression, note commitments, nullifier hashes
//! and tree roots. Other implementations of the protocol check themselves
//! against this file.
//!
//! The committed fixture holds the BLAKE3, MiMC and empty-root vectors
//! computed outside this workspace. `--verify` checks every vector the file
//! names, so it stays a known-answer baseline until it is regenerated.
//!
//! Usage:
//!   zkvault-testvec                  # Generate test_vectors.json
//!   zkvault-testvec --verify         # Verify test vectors match expected values
//!   zkvault-testvec --out <path>     # Write or verify a different file
//!
//! Logging follows the `[logging]` section of the file named by
//! `ZKVAULT_CONFIG`, overridden by `RUST_LOG`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use zkvault_crypto::field::{parse_field, to_decimal};
use zkvault_crypto::{Fr, HashContext};
use zkvault_merkle::{IncrementalTree, MerkleTree, ZeroHashes};
use zkvault_note::{commitment, nullifier_hash};
use zkvault_vault::VaultConfig;

const DEFAULT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test_vectors.json");

#[derive(Serialize, Deserialize)]
struct TestVectors {
    version: String,
    generated_by: String,
    vectors: BTreeMap<String, TestVector>,
}

#[derive(Serialize, Deserialize)]
struct TestVector {
    description: String,
    inputs: BTreeMap<String, String>,
    outputs: BTreeMap<String, String>,
}

/// Fixed notes: small values, values at the top of the 248-bit range, and a
/// pair sharing a nullifier.
const NOTES: &[(&str, &str)] = &[
    ("1", "2"),
    ("0xdeadbeef", "0xc0ffee"),
    ("0xdeadbeef", "0xc0ffef"),
    (
        "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        "0x0100000000000000000000000000000000000000000000000000000000000000",
    ),
];

fn field(value: &str) -> anyhow::Result<Fr> {
    parse_field(value).with_context(|| format!("bad field literal {value}"))
}

fn generate_hash_vectors(ctx: &HashContext) -> BTreeMap<String, TestVector> {
    let mut vectors = BTreeMap::new();

    vectors.insert(
        "zero_value".to_string(),
        TestVector {
            description: "BLAKE3(\"zkvault-classic\") mod r".to_string(),
            inputs: BTreeMap::from([("tag".to_string(), "zkvault-classic".to_string())]),
            outputs: BTreeMap::from([("value".to_string(), to_decimal(&ctx.zero_value()))]),
        },
    );

    for (left, right) in [(0u64, 0u64), (1, 2), (2, 1)] {
        let out = ctx.compress(&Fr::from(left), &Fr::from(right));
        vectors.insert(
            format!("mimc_hash_left_right_{left}_{right}"),
            TestVector {
                description: "MiMC sponge x^5, 220 rounds, key 0: absorb(left, right)".to_string(),
                inputs: BTreeMap::from([
                    ("left".to_string(), left.to_string()),
                    ("right".to_string(), right.to_string()),
                ]),
                outputs: BTreeMap::from([("hash".to_string(), to_decimal(&out))]),
            },
        );
    }

    vectors
}

fn generate_note_vectors(ctx: &HashContext) -> anyhow::Result<BTreeMap<String, TestVector>> {
    let mut vectors = BTreeMap::new();

    for (i, (nullifier, secret)) in NOTES.iter().enumerate() {
        let n = field(nullifier)?;
        let s = field(secret)?;
        let c = commitment(ctx, &n, &s)?;
        let h = nullifier_hash(ctx, &n)?;
        vectors.insert(
            format!("note_{i}"),
            TestVector {
                description:
                    "commitment = pedersen(LE31(n) || LE31(s)), nullifier_hash = pedersen(LE31(n))"
                        .to_string(),
                inputs: BTreeMap::from([
                    ("nullifier".to_string(), to_decimal(&n)),
                    ("secret".to_string(), to_decimal(&s)),
                ]),
                outputs: BTreeMap::from([
                    ("commitment".to_string(), to_decimal(&c)),
                    ("nullifier_hash".to_string(), to_decimal(&h)),
                ]),
            },
        );
    }

    Ok(vectors)
}

fn generate_tree_vectors(ctx: &Arc<HashContext>) -> anyhow::Result<BTreeMap<String, TestVector>> {
    let mut vectors = BTreeMap::new();

    for levels in [1usize, 3, 10, 20, 32] {
        let zeros = ZeroHashes::new(ctx, levels)?;
        vectors.insert(
            format!("empty_root_{levels}"),
            TestVector {
                description: "Root of an empty tree".to_string(),
                inputs: BTreeMap::from([("levels".to_string(), levels.to_string())]),
                outputs: BTreeMap::from([("root".to_string(), to_decimal(&zeros.empty_root()))]),
            },
        );
    }

    let leaves = NOTES
        .iter()
        .map(|(n, s)| -> anyhow::Result<Fr> { Ok(commitment(ctx, &field(n)?, &field(s)?)?) })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let leaf_list = leaves.iter().map(to_decimal).collect::<Vec<_>>().join(",");

    for levels in [3usize, 20] {
        let mut incremental = IncrementalTree::new(Arc::clone(ctx), levels, leaves.len())?;
        let mut outputs = BTreeMap::new();
        for (i, leaf) in leaves.iter().enumerate() {
            incremental.insert(*leaf)?;
            outputs.insert(format!("root_{}", i + 1), to_decimal(&incremental.current_root()));
        }
        let rebuilt = MerkleTree::from_leaves(Arc::clone(ctx), levels, &leaves)?;
        if rebuilt.root() != incremental.current_root() {
            bail!("rebuilt and incremental roots disagree at {levels} levels");
        }
        let historical = MerkleTree::historical_root(Arc::clone(ctx), levels, &leaves, 2)?;
        if outputs.get("root_2") != Some(&to_decimal(&historical)) {
            bail!("historical root disagrees at {levels} levels");
        }
        vectors.insert(
            format!("note_tree_{levels}"),
            TestVector {
                description: "Roots after each insertion of the note commitments".to_string(),
                inputs: BTreeMap::from([
                    ("levels".to_string(), levels.to_string()),
                    ("leaves".to_string(), leaf_list.clone()),
                ]),
                outputs,
            },
        );
    }

    Ok(vectors)
}

fn generate_all_vectors(ctx: &Arc<HashContext>) -> anyhow::Result<TestVectors> {
    let mut all_vectors = BTreeMap::new();
    all_vectors.extend(generate_hash_vectors(ctx));
    all_vectors.extend(generate_note_vectors(ctx)?);
    all_vectors.extend(generate_tree_vectors(ctx)?);

    Ok(TestVectors {
        version: "1".to_string(),
        generated_by: format!("zkvault-testvec {}", env!("CARGO_PKG_VERSION")),
        vectors: all_vectors,
    })
}

fn verify_vectors(expected: &TestVectors, regenerated: &TestVectors) -> bool {
    let mut all_pass = true;

    for (name, vector) in &expected.vectors {
        match regenerated.vectors.get(name) {
            Some(actual) if actual.outputs == vector.outputs => {
                tracing::debug!(%name, "vector passed");
            }
            Some(actual) => {
                tracing::error!(
                    %name,
                    expected = ?vector.outputs,
                    actual = ?actual.outputs,
                    "vector mismatch"
                );
                all_pass = false;
            }
            None => {
                tracing::error!(%name, "vector missing");
                all_pass = false;
            }
        }
    }

    all_pass
}

fn write_vectors(path: &Path, vectors: &TestVectors) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(vectors)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(count = vectors.vectors.len(), path = %path.display(), "test vectors written");
    Ok(())
}

fn init_logging(config: &VaultConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.log_directive().parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = VaultConfig::load_default()?;
    init_logging(&config)?;

    let args: Vec<String> = std::env::args().collect();
    let verify = args.iter().any(|a| a == "--verify");
    let path = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1))
        .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);

    let ctx = Arc::new(HashContext::new()?);
    let regenerated = generate_all_vectors(&ctx)?;

    if verify && path.exists() {
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let expected: TestVectors = serde_json::from_str(&content)?;
        if !verify_vectors(&expected, &regenerated) {
            bail!("test vector verification failed");
        }
        tracing::info!(count = expected.vectors.len(), "all test vectors verified");
        return Ok(());
    }

    if verify {
        tracing::warn!(path = %path.display(), "no existing test vectors, generating");
    }
    write_vectors(&path, &regenerated)?;
    if !verify_vectors(&regenerated, &generate_all_vectors(&ctx)?) {
        bail!("self-verification failed");
    }
    tracing::info!("self-verification passed");
    Ok(())
}
