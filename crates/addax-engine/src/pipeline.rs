//! The per-automaton analysis pipeline.
//!
//! Ordering matters: the GCD is confirmed first because the basis questions
//! are only posed for exponential unit-GCD automata, and each exact result
//! is cross-checked against its heuristic counterpart before it is trusted.

use thiserror::Error;
use tracing::{debug, info};

use addax_automata::gcd::{candidate_gcds, heuristic_gcd};
use addax_automata::growth::analyze_growth;
use addax_automata::heuristics::heuristic_is_polynomial;
use addax_automata::{Automaton, AutomatonError};
use addax_prover::{ProverError, ProverOracle, ProverQuery};

use crate::result::{source_fingerprint, AutomatonReport, BasisOrder, GcdVerdict, GrowthLabel};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    #[error(transparent)]
    Prover(#[from] ProverError),
    #[error(
        "gcd cross-check failed for {canonical}: prover confirmed {exact}, sampling found {heuristic}"
    )]
    GcdCrossCheck {
        canonical: String,
        exact: u64,
        heuristic: u64,
    },
    #[error(
        "growth cross-check failed for {canonical}: exact polynomial={exact_polynomial}, heuristic polynomial={heuristic_polynomial}"
    )]
    GrowthCrossCheck {
        canonical: String,
        exact_polynomial: bool,
        heuristic_polynomial: bool,
    },
}

/// Tunable bounds for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Word-length bound for the matrix-power growth estimate.
    pub growth_word_length_bound: usize,
    /// The heuristic GCD samples all accepted values below `2^certainty_bits`.
    pub gcd_certainty_bits: u32,
    /// Compute additive-basis orders up to this summand cap. `None` skips
    /// the order queries entirely.
    pub basis_order: Option<usize>,
    /// Also compute the non-asymptotic (every integer, not just sufficiently
    /// large ones) order.
    pub non_asymptotic: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            growth_word_length_bound: 62,
            gcd_certainty_bits: 10,
            basis_order: None,
            non_asymptotic: false,
        }
    }
}

/// Run the full analysis for one automaton.
pub fn analyze(
    aut: &Automaton,
    oracle: &mut dyn ProverOracle,
    options: &PipelineOptions,
) -> Result<AutomatonReport, EngineError> {
    let canonical = aut.canonical_description().to_string();
    debug!(automaton = %canonical, "starting analysis");
    oracle.load_word_automaton(aut)?;

    let gcd = confirm_gcd(aut, oracle)?;
    let sampled_gcd = heuristic_gcd(aut, options.gcd_certainty_bits);
    if gcd.value() != sampled_gcd {
        return Err(EngineError::GcdCrossCheck {
            canonical,
            exact: gcd.value(),
            heuristic: sampled_gcd,
        });
    }

    let growth: GrowthLabel = analyze_growth(aut).class.into();
    let heuristic_polynomial = heuristic_is_polynomial(aut, options.growth_word_length_bound);
    if growth.is_polynomial() != heuristic_polynomial {
        return Err(EngineError::GrowthCrossCheck {
            canonical,
            exact_polynomial: growth.is_polynomial(),
            heuristic_polynomial,
        });
    }

    // Only sets of exponential growth with unit GCD can be additive bases.
    let basis_candidate = !growth.is_polynomial() && gcd.is_unit();
    let mut contains_one = None;
    let mut asymptotic_order = None;
    let mut exact_order = None;
    if basis_candidate {
        contains_one = Some(aut.accepts_value(1));
        if let Some(max_order) = options.basis_order {
            asymptotic_order = Some(confirm_order(oracle, max_order, true)?);
            if options.non_asymptotic {
                exact_order = Some(confirm_order(oracle, max_order, false)?);
            }
        }
    }

    info!(
        automaton = %canonical,
        %growth,
        gcd = gcd.value(),
        basis_candidate,
        "analysis complete"
    );
    Ok(AutomatonReport {
        source_fingerprint: source_fingerprint(&canonical),
        canonical,
        growth,
        gcd,
        basis_candidate,
        contains_one,
        asymptotic_order,
        exact_order,
    })
}

/// Confirm candidate divisors from largest to smallest; the first one the
/// prover accepts is the GCD of the accepted set.
fn confirm_gcd(
    aut: &Automaton,
    oracle: &mut dyn ProverOracle,
) -> Result<GcdVerdict, EngineError> {
    let Some(candidates) = candidate_gcds(aut) else {
        debug!("no nonzero accepted value, gcd undetermined");
        return Ok(GcdVerdict::Undetermined);
    };
    for divisor in candidates {
        if oracle.confirm(&ProverQuery::DividesAll { divisor })? {
            debug!(divisor, "gcd confirmed");
            return Ok(GcdVerdict::Confirmed(divisor));
        }
    }
    // 1 is always among the candidates and divides everything, so reaching
    // this point means the oracle refuted a tautology.
    Ok(GcdVerdict::Undetermined)
}

fn confirm_order(
    oracle: &mut dyn ProverOracle,
    max_order: usize,
    asymptotic: bool,
) -> Result<BasisOrder, EngineError> {
    for summands in 1..=max_order {
        if oracle.confirm(&ProverQuery::BasisOrder {
            summands,
            asymptotic,
        })? {
            debug!(summands, asymptotic, "basis order confirmed");
            return Ok(BasisOrder::Order(summands));
        }
    }
    Ok(BasisOrder::ExceedsMax(max_order))
}
