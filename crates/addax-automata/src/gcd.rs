//! GCD candidate generation and the brute-force GCD cross-check.
//!
//! The GCD of all accepted integers divides the smallest nonzero accepted
//! value, so its divisors are the only possible GCDs. Candidates are
//! returned largest first: a large divisor is the most restrictive claim and
//! the cheapest for the external prover to refute.

use std::collections::VecDeque;

use tracing::warn;

use crate::automaton::{Automaton, StateId, Symbol};

/// Divisors of the smallest nonzero accepted value, descending.
///
/// `None` when no nonzero-leading path reaches an accepting state: the
/// automaton accepts only zero (or nothing), and no finite GCD witness
/// exists.
pub fn candidate_gcds(aut: &Automaton) -> Option<Vec<u64>> {
    let word = smallest_nonzero_accepted(aut)?;
    let value = word_value(aut, &word)?;
    let mut divisors = Vec::new();
    let mut low = 1u64;
    while low <= value / low {
        if value % low == 0 {
            divisors.push(low);
            let high = value / low;
            if high != low {
                divisors.push(high);
            }
        }
        low += 1;
    }
    divisors.sort_unstable_by(|a, b| b.cmp(a));
    Some(divisors)
}

/// Shortest accepted word representing a nonzero integer.
///
/// Breadth-first search from the initial state, seeded only by nonzero
/// symbols so every discovered path starts with a significant digit; the
/// word is rebuilt from parent/symbol back-pointers.
pub fn smallest_nonzero_accepted(aut: &Automaton) -> Option<Vec<Symbol>> {
    let n = aut.state_count();
    let initial = aut.initial_state();
    let mut visited = vec![false; n];
    let mut prev = vec![StateId::MAX; n];
    let mut prev_symbol = vec![0 as Symbol; n];
    let mut queue = VecDeque::new();

    for symbol in 1..aut.alphabet_size() {
        let start = aut.step(initial, symbol);
        if !visited[start] {
            visited[start] = true;
            prev[start] = initial;
            prev_symbol[start] = symbol;
            queue.push_back(start);
        }
    }

    while let Some(curr) = queue.pop_front() {
        if aut.is_accepting(curr) {
            let mut word = vec![prev_symbol[curr]];
            let mut nonzero_seen = prev_symbol[curr] != 0;
            let mut walk = prev[curr];
            // The path may pass through the initial state again; keep
            // walking until the significant leading digit is captured.
            while walk != initial || !nonzero_seen {
                word.push(prev_symbol[walk]);
                nonzero_seen |= prev_symbol[walk] != 0;
                walk = prev[walk];
            }
            word.reverse();
            return Some(word);
        }
        for symbol in 0..aut.alphabet_size() {
            let next = aut.step(curr, symbol);
            if !visited[next] {
                visited[next] = true;
                prev[next] = curr;
                prev_symbol[next] = symbol;
                queue.push_back(next);
            }
        }
    }

    None
}

/// Running GCD over every accepted integer in `1..2^certainty_bits`.
///
/// Bounded sample, not exact: the result is a multiple of the true GCD.
/// Returns 0 when no nonzero value in range is accepted.
pub fn heuristic_gcd(aut: &Automaton, certainty_bits: u32) -> u64 {
    let max = 1u64 << certainty_bits;
    let mut current = 0u64;
    for value in 1..max {
        if aut.accepts_value(value) {
            current = if current == 0 { value } else { gcd(value, current) };
        }
    }
    current
}

/// The integer a word spells in the automaton's radix, msd first.
fn word_value(aut: &Automaton, word: &[Symbol]) -> Option<u64> {
    let radix = aut.alphabet_size() as u64;
    let mut value = 0u64;
    for &symbol in word {
        value = match value
            .checked_mul(radix)
            .and_then(|v| v.checked_add(symbol as u64))
        {
            Some(v) => v,
            None => {
                warn!(len = word.len(), "witness value overflows u64; no candidates");
                return None;
            }
        };
    }
    Some(value)
}

fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b > 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
