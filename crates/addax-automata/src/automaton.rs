use std::fmt;

use thiserror::Error;

/// A unique identifier for an automaton state.
pub type StateId = usize;
/// An input symbol (a digit in `0..alphabet_size`).
pub type Symbol = usize;

#[derive(Debug, Error)]
pub enum AutomatonError {
    #[error("automaton must have at least one state")]
    NoStates,
    #[error("transition encoding length {len} is not a multiple of state count {states}")]
    RaggedTransitions { len: usize, states: usize },
    #[error("transition encoding is empty for {states} states")]
    EmptyTransitions { states: usize },
    #[error("alphabet size {alphabet} is not a usable radix; need at least 2")]
    NarrowAlphabet { alphabet: usize },
    #[error("invalid digit {digit:?} in {context} encoding")]
    InvalidDigit { digit: char, context: &'static str },
    #[error("state {state} out of range for {states} states")]
    StateOutOfRange { state: StateId, states: usize },
}

/// A complete deterministic finite automaton over a radix alphabet.
///
/// Words are msd-first digit strings; an accepted word denotes the integer
/// it spells in base `alphabet_size`. The automaton is immutable once built:
/// every state has exactly one successor per symbol and all indices are in
/// range, checked at construction.
#[derive(Debug, Clone)]
pub struct Automaton {
    state_count: usize,
    alphabet_size: usize,
    /// Row-major transition table: `transition[state * alphabet_size + symbol]`.
    transition: Vec<StateId>,
    accept: Vec<bool>,
    initial_state: StateId,
    canonical: String,
}

impl Automaton {
    /// Build an automaton from the description triple: state count, the
    /// transition digit string (one successor per symbol for every state in
    /// order), and the accepting-state digit string.
    ///
    /// The alphabet size (radix) is derived as
    /// `transitions.len() / state_count`.
    pub fn from_description(
        state_count: usize,
        transitions: &str,
        accepting: &str,
    ) -> Result<Self, AutomatonError> {
        if state_count == 0 {
            return Err(AutomatonError::NoStates);
        }
        if transitions.is_empty() {
            return Err(AutomatonError::EmptyTransitions {
                states: state_count,
            });
        }
        if transitions.len() % state_count != 0 {
            return Err(AutomatonError::RaggedTransitions {
                len: transitions.len(),
                states: state_count,
            });
        }
        let alphabet_size = transitions.len() / state_count;
        if alphabet_size < 2 {
            return Err(AutomatonError::NarrowAlphabet {
                alphabet: alphabet_size,
            });
        }

        let mut transition = Vec::with_capacity(transitions.len());
        for ch in transitions.chars() {
            let digit = ch
                .to_digit(10)
                .ok_or(AutomatonError::InvalidDigit {
                    digit: ch,
                    context: "transition",
                })? as StateId;
            if digit >= state_count {
                return Err(AutomatonError::StateOutOfRange {
                    state: digit,
                    states: state_count,
                });
            }
            transition.push(digit);
        }

        let mut accept = vec![false; state_count];
        for ch in accepting.chars() {
            let state = ch
                .to_digit(10)
                .ok_or(AutomatonError::InvalidDigit {
                    digit: ch,
                    context: "accepting",
                })? as StateId;
            if state >= state_count {
                return Err(AutomatonError::StateOutOfRange {
                    state,
                    states: state_count,
                });
            }
            accept[state] = true;
        }

        Ok(Self {
            state_count,
            alphabet_size,
            transition,
            accept,
            initial_state: 0,
            canonical: format!("{state_count}_{transitions}_{accepting}"),
        })
    }

    /// Build an automaton from explicit parts. The transition table lists,
    /// for every state in order, one successor per symbol.
    pub fn from_parts(
        state_count: usize,
        alphabet_size: usize,
        transition: Vec<StateId>,
        accepting: &[StateId],
    ) -> Result<Self, AutomatonError> {
        if state_count == 0 {
            return Err(AutomatonError::NoStates);
        }
        if alphabet_size < 2 {
            return Err(AutomatonError::NarrowAlphabet {
                alphabet: alphabet_size,
            });
        }
        if transition.len() != state_count * alphabet_size {
            return Err(AutomatonError::RaggedTransitions {
                len: transition.len(),
                states: state_count,
            });
        }
        for &target in &transition {
            if target >= state_count {
                return Err(AutomatonError::StateOutOfRange {
                    state: target,
                    states: state_count,
                });
            }
        }
        let mut accept = vec![false; state_count];
        for &state in accepting {
            if state >= state_count {
                return Err(AutomatonError::StateOutOfRange {
                    state,
                    states: state_count,
                });
            }
            accept[state] = true;
        }
        let transitions_str: String = transition
            .iter()
            .map(|t| char::from_digit(*t as u32 % 10, 10).unwrap_or('?'))
            .collect();
        let accepting_str: String = accepting
            .iter()
            .map(|s| char::from_digit(*s as u32 % 10, 10).unwrap_or('?'))
            .collect();
        Ok(Self {
            state_count,
            alphabet_size,
            transition,
            accept,
            initial_state: 0,
            canonical: format!("{state_count}_{transitions_str}_{accepting_str}"),
        })
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// The numeration radix.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accept[state]
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.state_count).filter(|&s| self.accept[s])
    }

    /// The unique successor of `state` under `symbol`.
    pub fn step(&self, state: StateId, symbol: Symbol) -> StateId {
        self.transition[state * self.alphabet_size + symbol]
    }

    /// Canonical `{states}_{transitions}_{accepting}` identifier used toward
    /// the external prover and in reports.
    pub fn canonical_description(&self) -> &str {
        &self.canonical
    }

    /// Run the automaton over a symbol word (msd first).
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut state = self.initial_state;
        for &symbol in word {
            state = self.step(state, symbol);
        }
        self.accept[state]
    }

    /// Whether the integer `value`, spelled msd-first in the automaton's
    /// radix, is accepted. Zero is the empty-prefix numeral `0`.
    pub fn accepts_value(&self, value: u64) -> bool {
        self.accepts(&radix_digits(value, self.alphabet_size))
    }

    /// Successor lists per state, sorted and deduplicated. The adjacency
    /// view drops symbol information; it exists for the graph passes.
    pub fn adjacency(&self) -> Vec<Vec<StateId>> {
        let mut adj = vec![Vec::new(); self.state_count];
        for state in 0..self.state_count {
            for symbol in 0..self.alphabet_size {
                adj[state].push(self.step(state, symbol));
            }
            adj[state].sort_unstable();
            adj[state].dedup();
        }
        adj
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Automaton: {} states, radix {}",
            self.state_count, self.alphabet_size
        )?;
        for state in 0..self.state_count {
            let marker = if self.accept[state] { " (accepting)" } else { "" };
            writeln!(f, "  q{state}{marker}")?;
            for symbol in 0..self.alphabet_size {
                writeln!(f, "    {symbol} -> q{}", self.step(state, symbol))?;
            }
        }
        Ok(())
    }
}

/// msd-first digits of `value` in base `radix`. Zero is the single digit 0.
pub fn radix_digits(value: u64, radix: usize) -> Vec<Symbol> {
    debug_assert!(radix >= 2);
    if value == 0 {
        return vec![0];
    }
    let radix = radix as u64;
    let mut digits = Vec::new();
    let mut rest = value;
    while rest > 0 {
        digits.push((rest % radix) as Symbol);
        rest /= radix;
    }
    digits.reverse();
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_roundtrip() {
        // Two states over base 2: state 0 loops on 0, goes to 1 on 1;
        // state 1 loops on both symbols. Accepting: state 1.
        let aut = Automaton::from_description(2, "0111", "1").unwrap();
        assert_eq!(aut.state_count(), 2);
        assert_eq!(aut.alphabet_size(), 2);
        assert_eq!(aut.canonical_description(), "2_0111_1");
        assert_eq!(aut.step(0, 0), 0);
        assert_eq!(aut.step(0, 1), 1);
        assert!(aut.is_accepting(1));
        assert!(!aut.is_accepting(0));
    }

    #[test]
    fn acceptance_over_words_and_values() {
        let aut = Automaton::from_description(2, "0111", "1").unwrap();
        assert!(aut.accepts(&[1]));
        assert!(aut.accepts(&[0, 1, 0]));
        assert!(!aut.accepts(&[0]));
        assert!(!aut.accepts(&[]));

        assert!(aut.accepts_value(1));
        assert!(aut.accepts_value(6));
        assert!(!aut.accepts_value(0));
    }

    #[test]
    fn malformed_descriptions_fail_fast() {
        assert!(matches!(
            Automaton::from_description(0, "0", ""),
            Err(AutomatonError::NoStates)
        ));
        assert!(matches!(
            Automaton::from_description(2, "011", "1"),
            Err(AutomatonError::RaggedTransitions { .. })
        ));
        assert!(matches!(
            Automaton::from_description(2, "0131", "1"),
            Err(AutomatonError::StateOutOfRange { state: 3, .. })
        ));
        assert!(matches!(
            Automaton::from_description(2, "01x1", "1"),
            Err(AutomatonError::InvalidDigit { .. })
        ));
        assert!(matches!(
            Automaton::from_description(2, "0111", "7"),
            Err(AutomatonError::StateOutOfRange { state: 7, .. })
        ));
    }

    #[test]
    fn unary_radix_is_rejected_at_construction() {
        // One transition digit per state would make accepts_value loop on
        // the radix expansion; construction must refuse it.
        assert!(matches!(
            Automaton::from_description(2, "01", "0"),
            Err(AutomatonError::NarrowAlphabet { alphabet: 1 })
        ));
        assert!(matches!(
            Automaton::from_parts(2, 1, vec![0, 1], &[0]),
            Err(AutomatonError::NarrowAlphabet { alphabet: 1 })
        ));
    }

    #[test]
    fn adjacency_is_sorted_and_deduplicated() {
        let aut = Automaton::from_description(2, "1100", "0").unwrap();
        let adj = aut.adjacency();
        assert_eq!(adj[0], vec![1]);
        assert_eq!(adj[1], vec![0]);
    }

    #[test]
    fn radix_digit_expansion() {
        assert_eq!(radix_digits(0, 2), vec![0]);
        assert_eq!(radix_digits(6, 2), vec![1, 1, 0]);
        assert_eq!(radix_digits(11, 3), vec![1, 0, 2]);
    }
}
