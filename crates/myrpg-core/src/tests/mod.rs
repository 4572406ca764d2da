//! Crate-level battle tests.
//!
//! - `scenarios.rs`: end-to-end battles through the turn sequencer
//! - `determinism.rs`: same seed, same battle
//! - `properties.rs`: proptest invariants over fighters and battles
//! - `helpers.rs`: scripted randomness, skill and profile fixtures

mod helpers;
mod properties;
