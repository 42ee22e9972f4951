//! Integration test crate for the zkvault protocol.
//!
//! This crate has no library code. It only contains integration tests that
//! run deposits and withdrawals end to end across the workspace crates,
//! with real Groth16 keys generated for small trees.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p zkvault-integration-tests
//! ```
