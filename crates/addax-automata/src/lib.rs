#![doc = include_str!("../README.md")]

//! Automaton model and growth/GCD analysis.
//!
//! This crate defines the DFA representation over radix numerals, SCC
//! decomposition, cycling-word/primitive-root extraction, the exact growth
//! classifier, the GCD candidate generator, and the heuristic estimators
//! used to cross-check both exact analyses.

pub mod automaton;
pub mod gcd;
pub mod growth;
pub mod heuristics;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod scc;
pub mod words;

pub use automaton::{Automaton, AutomatonError, StateId, Symbol};
pub use growth::GrowthClass;
