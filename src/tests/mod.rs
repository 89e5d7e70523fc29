//! Crate-level tests.
//!
//! - Integration tests (real HTTP transport against a local endpoint)
//! - Fuzz tests (randomized properties of the numeric transforms)

pub mod integration;
