#![doc = include_str!("../README.md")]

pub mod pipeline;
pub mod result;

pub use pipeline::{analyze, EngineError, PipelineOptions};
pub use result::{AutomatonReport, BasisOrder, GcdVerdict, GrowthLabel, Summary};
