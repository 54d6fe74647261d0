//! Structural laws checked over generated automata and words.

use proptest::prelude::*;

use addax_automata::proptest_generators::{arb_automaton, arb_binary_word};
use addax_automata::{gcd, growth, scc, words, GrowthClass};

proptest! {
    #[test]
    fn scc_labels_partition_the_states(aut in arb_automaton()) {
        let labeling = scc::decompose(&aut.adjacency());
        prop_assert!(labeling.count() >= 1);
        prop_assert!(labeling.count() <= aut.state_count());

        let mut seen = vec![0usize; aut.state_count()];
        for component in 0..labeling.count() {
            for state in labeling.members(component) {
                prop_assert_eq!(labeling.id(state), component);
                seen[state] += 1;
            }
        }
        // Every state belongs to exactly one component.
        prop_assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn mutually_reachable_states_share_a_component(aut in arb_automaton()) {
        let adj = aut.adjacency();
        let labeling = scc::decompose(&adj);
        let reach = reachability_closure(&adj);
        for a in 0..aut.state_count() {
            for b in 0..aut.state_count() {
                if a == b {
                    prop_assert!(labeling.same_component(a, b));
                    continue;
                }
                let mutual = reach[a][b] && reach[b][a];
                prop_assert_eq!(labeling.same_component(a, b), mutual);
            }
        }
    }

    #[test]
    fn primitive_root_regenerates_the_word(word in arb_binary_word()) {
        let root = words::primitive_root(&word);
        prop_assert!(!root.is_empty());
        prop_assert_eq!(word.len() % root.len(), 0);
        let rebuilt: Vec<_> = root
            .iter()
            .cycle()
            .take(word.len())
            .copied()
            .collect();
        prop_assert_eq!(rebuilt, word);
    }

    #[test]
    fn primitive_root_is_idempotent(word in arb_binary_word()) {
        let root = words::primitive_root(&word).to_vec();
        prop_assert_eq!(words::primitive_root(&root), root.as_slice());
    }

    #[test]
    fn classification_is_deterministic(aut in arb_automaton()) {
        let first = growth::classify_growth(&aut);
        prop_assert_eq!(first, growth::classify_growth(&aut));
    }

    #[test]
    fn no_accepting_cycle_means_polynomial(aut in arb_automaton()) {
        // An automaton with no accepting state accepts nothing, and the
        // empty language grows polynomially.
        if aut.accepting_states().next().is_none() {
            prop_assert_eq!(growth::classify_growth(&aut), GrowthClass::Polynomial);
        }
    }

    #[test]
    fn candidate_gcds_divide_the_smallest_witness(aut in arb_automaton()) {
        if let Some(candidates) = gcd::candidate_gcds(&aut) {
            prop_assert!(!candidates.is_empty());
            let largest = candidates[0];
            // Descending order, 1 always present, every entry divides the
            // witness value (the largest candidate).
            prop_assert!(candidates.windows(2).all(|w| w[0] > w[1]));
            prop_assert_eq!(*candidates.last().unwrap(), 1);
            prop_assert!(candidates.iter().all(|&d| largest % d == 0));
        }
    }
}

fn reachability_closure(adj: &[Vec<usize>]) -> Vec<Vec<bool>> {
    let n = adj.len();
    let mut reach = vec![vec![false; n]; n];
    for start in 0..n {
        let mut stack = vec![start];
        while let Some(state) = stack.pop() {
            for &next in &adj[state] {
                if !reach[start][next] {
                    reach[start][next] = true;
                    stack.push(next);
                }
            }
        }
    }
    reach
}
