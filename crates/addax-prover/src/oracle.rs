//! Abstract prover oracle and the scripted test double.

use std::collections::VecDeque;

use thiserror::Error;

use addax_automata::Automaton;

use crate::query::ProverQuery;

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("prover i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to start prover process `{command}`: {reason}")]
    Spawn { command: String, reason: String },
    #[error("no word automaton loaded before query")]
    AutomatonNotLoaded,
    #[error("prover result {name} did not appear within {waited_secs}s")]
    ResultTimeout { name: String, waited_secs: u64 },
    #[error("malformed prover response for {name}: {response:?}")]
    MalformedResponse { name: String, response: String },
    #[error("scripted oracle ran out of responses at query {name}")]
    ScriptExhausted { name: String },
}

/// A pure boolean-valued prover.
///
/// The contract is strict: the caller loads one word automaton, then asks
/// yes/no questions about it. A missing or garbled answer is the oracle's
/// failure, surfaced as an error; the oracle is never retried.
pub trait ProverOracle {
    /// Publish `aut` as the word automaton queries refer to.
    fn load_word_automaton(&mut self, aut: &Automaton) -> Result<(), ProverError>;

    /// Ask one first-order question about the loaded automaton.
    fn confirm(&mut self, query: &ProverQuery) -> Result<bool, ProverError>;
}

/// In-memory oracle answering from a fixed script, for tests.
///
/// Records every rendered command so tests can assert on the exact query
/// sequence the engine produced.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    responses: VecDeque<bool>,
    canonical: Option<String>,
    /// Rendered `eval` commands in submission order.
    pub submitted: Vec<String>,
}

impl ScriptedOracle {
    pub fn new(responses: impl IntoIterator<Item = bool>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            canonical: None,
            submitted: Vec::new(),
        }
    }

    /// Whether every scripted response was consumed.
    pub fn exhausted(&self) -> bool {
        self.responses.is_empty()
    }
}

impl ProverOracle for ScriptedOracle {
    fn load_word_automaton(&mut self, aut: &Automaton) -> Result<(), ProverError> {
        self.canonical = Some(aut.canonical_description().to_string());
        Ok(())
    }

    fn confirm(&mut self, query: &ProverQuery) -> Result<bool, ProverError> {
        let canonical = self
            .canonical
            .as_deref()
            .ok_or(ProverError::AutomatonNotLoaded)?;
        self.submitted.push(query.eval_command(canonical));
        self.responses
            .pop_front()
            .ok_or_else(|| ProverError::ScriptExhausted {
                name: query.result_name(canonical),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_oracle_replays_responses_in_order() {
        let aut = Automaton::from_description(2, "0111", "1").unwrap();
        let mut oracle = ScriptedOracle::new([false, true]);
        oracle.load_word_automaton(&aut).unwrap();

        let first = oracle
            .confirm(&ProverQuery::DividesAll { divisor: 2 })
            .unwrap();
        let second = oracle
            .confirm(&ProverQuery::DividesAll { divisor: 1 })
            .unwrap();
        assert!(!first);
        assert!(second);
        assert!(oracle.exhausted());
        assert_eq!(oracle.submitted.len(), 2);
        assert!(oracle.submitted[0].starts_with("eval gcd2_2_0111_1"));
    }

    #[test]
    fn query_before_load_is_an_error() {
        let mut oracle = ScriptedOracle::new([true]);
        let err = oracle
            .confirm(&ProverQuery::DividesAll { divisor: 1 })
            .unwrap_err();
        assert!(matches!(err, ProverError::AutomatonNotLoaded));
    }

    #[test]
    fn exhausted_script_is_the_oracles_failure() {
        let aut = Automaton::from_description(2, "0111", "1").unwrap();
        let mut oracle = ScriptedOracle::new([]);
        oracle.load_word_automaton(&aut).unwrap();
        let err = oracle
            .confirm(&ProverQuery::BasisOrder {
                summands: 1,
                asymptotic: true,
            })
            .unwrap_err();
        assert!(matches!(err, ProverError::ScriptExhausted { .. }));
    }
}
