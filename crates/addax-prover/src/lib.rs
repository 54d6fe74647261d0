#![doc = include_str!("../README.md")]

//! Walnut prover integration.
//!
//! Query rendering ([`query`]), the abstract boolean oracle with a scripted
//! test double ([`oracle`]), and the process-backed Walnut driver
//! ([`walnut`]).

pub mod oracle;
pub mod query;
pub mod walnut;

pub use oracle::{ProverError, ProverOracle, ScriptedOracle};
pub use query::ProverQuery;
pub use walnut::{WalnutConfig, WalnutProver};
