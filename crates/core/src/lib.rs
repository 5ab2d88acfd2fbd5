//! difftest-core
//!
//! Core library for recovering a function inventory from a flat assembly
//! listing and synthesizing differential test suites from it.
//!
//! This crate defines the data model, the scan/resolve/classify analysis
//! stages, the persisted inventory listing, suite descriptors and their
//! renderers, and the runtime harness the generated suites call into.

pub mod analysis;
pub mod config;
pub mod harness;
pub mod inventory;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod suite;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
