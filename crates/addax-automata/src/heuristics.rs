//! Matrix-power growth heuristic.
//!
//! Counts accepted words of a spread of lengths near a bound via repeated
//! squaring of the transition count matrix, and compares the maximum count
//! against an exponential threshold. A statistical sanity check for the
//! exact classifier, never authoritative: callers must treat disagreement
//! with the exact verdict as a fatal inconsistency.

use tracing::debug;

use crate::automaton::Automaton;

type CountMatrix = Vec<Vec<u64>>;

/// Approximate growth check: do accepted-word counts near
/// `word_length_bound` stay below `2^((bound - n) / n)`?
///
/// Counts saturate at `u64::MAX`; saturation only pushes an exponential
/// automaton further past the threshold.
pub fn heuristic_is_polynomial(aut: &Automaton, word_length_bound: usize) -> bool {
    let n = aut.state_count();
    let mut counts = vec![vec![0u64; n]; n];
    for state in 0..n {
        for symbol in 0..aut.alphabet_size() {
            counts[state][aut.step(state, symbol)] += 1;
        }
    }

    let base_length = word_length_bound.saturating_sub(n);
    let max_length = base_length + n - 1;

    // powers[i] holds the count matrix raised to 2^i, enough to cover every
    // bit of the longest sampled length.
    let mut powers = vec![counts];
    while (1usize << powers.len()) <= max_length.max(1) {
        let last = powers.len() - 1;
        let square = multiply(&powers[last], &powers[last]);
        powers.push(square);
    }

    let mut max_accepted = 0u64;
    for offset in 0..n {
        let accepted = count_words_of_length(aut, base_length + offset, &powers);
        max_accepted = max_accepted.max(accepted);
    }

    let exponent = (word_length_bound.saturating_sub(n) / n) as u32;
    let threshold = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    debug!(max_accepted, threshold, "heuristic growth comparison");
    max_accepted < threshold
}

/// Number of accepted words of exactly `length`, composed from the binary
/// representation of the length over the precomputed squarings.
fn count_words_of_length(aut: &Automaton, length: usize, powers: &[CountMatrix]) -> u64 {
    let n = aut.state_count();
    let mut product: CountMatrix = vec![vec![0; n]; n];
    for (i, row) in product.iter_mut().enumerate() {
        row[i] = 1;
    }
    for (bit, power) in powers.iter().enumerate() {
        if length & (1usize << bit) != 0 {
            product = multiply(&product, power);
        }
    }
    let initial = aut.initial_state();
    aut.accepting_states()
        .fold(0u64, |sum, state| sum.saturating_add(product[initial][state]))
}

fn multiply(a: &CountMatrix, b: &CountMatrix) -> CountMatrix {
    let m = a.len();
    let n = b[0].len();
    let inner = b.len();
    let mut result = vec![vec![0u64; n]; m];
    for i in 0..m {
        for k in 0..inner {
            let factor = a[i][k];
            if factor == 0 {
                continue;
            }
            for j in 0..n {
                result[i][j] = result[i][j].saturating_add(factor.saturating_mul(b[k][j]));
            }
        }
    }
    result
}
