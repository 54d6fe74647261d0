//! Proptest strategies for generating well-formed [`Automaton`] instances.

use proptest::prelude::*;

use crate::automaton::Automaton;

/// Strategy for a well-formed automaton suitable for property testing.
///
/// Generated automata have:
/// - 1–6 states with a complete transition table
/// - radix 2 or 3
/// - an arbitrary (possibly empty) accepting subset
pub fn arb_automaton() -> impl Strategy<Value = Automaton> {
    (1..=6usize, 2..=3usize)
        .prop_flat_map(|(states, alphabet)| {
            let transitions = proptest::collection::vec(0..states, states * alphabet);
            let accepting = proptest::collection::vec(0..states, 0..=states);
            (Just(states), Just(alphabet), transitions, accepting)
        })
        .prop_map(|(states, alphabet, transition, accepting)| {
            Automaton::from_parts(states, alphabet, transition, &accepting)
                .expect("generated automaton parts are well-formed")
        })
}

/// Strategy for short words over a binary alphabet, for word-level laws.
pub fn arb_binary_word() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0..2usize, 1..=12)
}
