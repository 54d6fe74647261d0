//! Cycling-word extraction and primitive-root computation.
//!
//! A cycling word for a state is a non-empty word that returns the state to
//! itself while staying inside its strongly connected component. Its
//! primitive root is the unique shortest word whose repetition reproduces it.

use std::collections::VecDeque;

use crate::automaton::{Automaton, StateId, Symbol};
use crate::scc::SccLabeling;

/// Find the shortest cycling word for `state`, restricted to its component.
///
/// Breadth-first search over in-component states with parent/symbol
/// back-pointers. Returns `None` when the component is trivial: a singleton
/// with no self-loop has no internal cycle.
pub fn find_cycling_word(
    aut: &Automaton,
    state: StateId,
    components: &SccLabeling,
) -> Option<Vec<Symbol>> {
    let n = aut.state_count();
    let home = components.id(state);
    let mut prev = vec![StateId::MAX; n];
    let mut prev_symbol = vec![0 as Symbol; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    for symbol in 0..aut.alphabet_size() {
        let next = aut.step(state, symbol);
        if components.id(next) != home {
            continue;
        }
        if next == state {
            return Some(vec![symbol]);
        }
        if !visited[next] {
            visited[next] = true;
            prev[next] = state;
            prev_symbol[next] = symbol;
            queue.push_back(next);
        }
    }

    while let Some(curr) = queue.pop_front() {
        for symbol in 0..aut.alphabet_size() {
            let next = aut.step(curr, symbol);
            if components.id(next) != home {
                continue;
            }
            if next == state {
                let mut word = vec![symbol];
                let mut walk = curr;
                while walk != state {
                    word.push(prev_symbol[walk]);
                    walk = prev[walk];
                }
                word.reverse();
                return Some(word);
            }
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

/// The primitive root of `word`: the shortest `r` with `word = r^k`.
///
/// Classic failure-function shortest-period search: the minimal period is
/// `n - fail[n-1]`, and it yields the root exactly when it divides the word
/// length. Length-1 words are their own root.
pub fn primitive_root(word: &[Symbol]) -> &[Symbol] {
    let n = word.len();
    if n <= 1 {
        return word;
    }
    let fail = failure_function(word);
    let period = n - fail[n - 1];
    if n % period == 0 {
        &word[..period]
    } else {
        word
    }
}

/// KMP failure function: `fail[i]` is the length of the longest proper
/// border of `word[..=i]`.
fn failure_function(word: &[Symbol]) -> Vec<usize> {
    let mut fail = vec![0usize; word.len()];
    let mut len = 0;
    let mut i = 1;
    while i < word.len() {
        if word[i] == word[len] {
            len += 1;
            fail[i] = len;
            i += 1;
        } else if len > 0 {
            len = fail[len - 1];
        } else {
            i += 1;
        }
    }
    fail
}
