//! Exact polynomial-vs-exponential growth classification.
//!
//! Implements the polynomial-time growth-rate test of Gawrychowski, Krieger,
//! Rampersad and Shallit: the accepted language grows polynomially iff every
//! non-trivial co-reachable strongly connected component behaves like a
//! single commutative cycle. Each such component is checked by assigning its
//! states residues along the primitive root of a cycling word and verifying
//! that every in-component transition is the one the residue prescribes.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::automaton::{Automaton, StateId, Symbol};
use crate::scc::{self, ComponentId, SccLabeling};
use crate::words;

/// Growth class of the accepted language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthClass {
    Polynomial,
    Exponential,
}

impl GrowthClass {
    pub fn is_polynomial(self) -> bool {
        matches!(self, GrowthClass::Polynomial)
    }
}

/// One non-trivial component examined during classification.
#[derive(Debug, Clone)]
pub struct ExaminedComponent {
    pub component: ComponentId,
    /// The state the cycling word was extracted at.
    pub seed: StateId,
    /// Length of the primitive root driving the residue assignment.
    pub root_len: usize,
}

/// Outcome of the exact classifier with its structural witnesses.
#[derive(Debug, Clone)]
pub struct GrowthAnalysis {
    pub class: GrowthClass,
    /// Components that passed the commutativity check, in examination order.
    /// On an exponential verdict the offending component is the last entry.
    pub examined: Vec<ExaminedComponent>,
}

/// Classify the growth of the accepted language.
pub fn classify_growth(aut: &Automaton) -> GrowthClass {
    analyze_growth(aut).class
}

/// Classify the growth of the accepted language, keeping per-component
/// witnesses (seed state, primitive root length).
pub fn analyze_growth(aut: &Automaton) -> GrowthAnalysis {
    let components = scc::decompose(&aut.adjacency());
    let co_reachable = co_reachable_states(aut);
    let mut completed = vec![false; components.count()];
    let mut examined = Vec::new();

    for state in 0..aut.state_count() {
        if completed[components.id(state)] || !co_reachable[state] {
            continue;
        }
        let Some(cycling) = words::find_cycling_word(aut, state, &components) else {
            // Trivial component: no internal cycle, no exponential blow-up.
            continue;
        };
        let root = words::primitive_root(&cycling).to_vec();
        debug!(state, ?cycling, ?root, "examining non-trivial component");
        examined.push(ExaminedComponent {
            component: components.id(state),
            seed: state,
            root_len: root.len(),
        });

        let Some(groups) = assign_residues(aut, state, &root, &components) else {
            debug!(state, "state revisited with conflicting residue");
            return GrowthAnalysis {
                class: GrowthClass::Exponential,
                examined,
            };
        };
        trace!(?groups, "residue assignment");
        if !verify_commutative(aut, &root, &groups, &components) {
            debug!(state, "in-component transition off the prescribed period");
            return GrowthAnalysis {
                class: GrowthClass::Exponential,
                examined,
            };
        }
        completed[components.id(state)] = true;
    }

    GrowthAnalysis {
        class: GrowthClass::Polynomial,
        examined,
    }
}

/// States from which some accepting state is still reachable.
///
/// Single reverse reachability pass from the accepting states; states
/// outside this set contribute no accepted words.
pub fn co_reachable_states(aut: &Automaton) -> Vec<bool> {
    let n = aut.state_count();
    let mut reverse = vec![Vec::new(); n];
    for state in 0..n {
        for symbol in 0..aut.alphabet_size() {
            reverse[aut.step(state, symbol)].push(state);
        }
    }
    let mut co_reachable = vec![false; n];
    let mut queue: VecDeque<StateId> = VecDeque::new();
    for state in aut.accepting_states() {
        co_reachable[state] = true;
        queue.push_back(state);
    }
    while let Some(state) = queue.pop_front() {
        for &pred in &reverse[state] {
            if !co_reachable[pred] {
                co_reachable[pred] = true;
                queue.push_back(pred);
            }
        }
    }
    co_reachable
}

/// Propagate residues from `seed` along the period-advancing symbols.
///
/// From a state with residue `i`, exactly the transition under `root[i]` is
/// followed; the chain stops when it leaves the component. Returns the
/// per-residue state groupings, or `None` when a state is revisited with a
/// conflicting residue — the structural obstruction that forces the
/// exponential verdict.
fn assign_residues(
    aut: &Automaton,
    seed: StateId,
    root: &[Symbol],
    components: &SccLabeling,
) -> Option<Vec<Vec<StateId>>> {
    let mut residue_of: Vec<Option<usize>> = vec![None; aut.state_count()];
    let mut groups: Vec<Vec<StateId>> = vec![Vec::new(); root.len()];
    let mut state = seed;
    let mut residue = 0;
    loop {
        if let Some(existing) = residue_of[state] {
            return (existing == residue).then_some(groups);
        }
        residue_of[state] = Some(residue);
        groups[residue].push(state);
        let next = aut.step(state, root[residue]);
        if !components.same_component(state, next) {
            return Some(groups);
        }
        state = next;
        residue = (residue + 1) % root.len();
    }
}

/// Check the commutativity condition over the assigned states: every symbol
/// whose target stays inside the component must be the residue's prescribed
/// period symbol.
fn verify_commutative(
    aut: &Automaton,
    root: &[Symbol],
    groups: &[Vec<StateId>],
    components: &SccLabeling,
) -> bool {
    for (residue, states) in groups.iter().enumerate() {
        for &state in states {
            for symbol in 0..aut.alphabet_size() {
                let next = aut.step(state, symbol);
                if components.same_component(state, next) && symbol != root[residue] {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automaton(states: usize, transitions: &str, accepting: &str) -> Automaton {
        Automaton::from_description(states, transitions, accepting).unwrap()
    }

    #[test]
    fn acyclic_path_to_accept_is_polynomial() {
        // Accepts exactly the word "1" (value 1): 0 loops on 0, moves to the
        // accepting state 1 on 1, and state 1 falls into the dead sink 2.
        let aut = automaton(3, "012222", "1");
        let analysis = analyze_growth(&aut);
        assert_eq!(analysis.class, GrowthClass::Polynomial);
        // Only the initial state's zero-loop component is non-trivial and
        // co-reachable; the dead sink is never examined.
        assert_eq!(analysis.examined.len(), 1);
        assert_eq!(analysis.examined[0].root_len, 1);
    }

    #[test]
    fn full_rotation_is_polynomial_with_cycle_length_root() {
        // 0 and 1 rotate on the symbols 0 then 1; everything else falls into
        // the dead sink 2.
        let aut = automaton(3, "122022", "0");
        let analysis = analyze_growth(&aut);
        assert_eq!(analysis.class, GrowthClass::Polynomial);
        assert_eq!(analysis.examined.len(), 1);
        assert_eq!(analysis.examined[0].root_len, 2);
    }

    #[test]
    fn off_period_transition_is_exponential() {
        // The accepting sink loops on both symbols: two in-component
        // transitions out of one state cannot both be the period symbol.
        let aut = automaton(2, "1111", "1");
        assert_eq!(classify_growth(&aut), GrowthClass::Exponential);
    }

    #[test]
    fn words_containing_a_one_is_exponential() {
        let aut = automaton(2, "0111", "1");
        assert_eq!(classify_growth(&aut), GrowthClass::Exponential);
    }

    #[test]
    fn multiples_of_three_is_exponential() {
        // States track value mod 3; accepting 0. A constant fraction of all
        // words is accepted.
        let aut = automaton(3, "012012", "0");
        assert_eq!(classify_growth(&aut), GrowthClass::Exponential);
    }

    #[test]
    fn non_co_reachable_components_are_ignored() {
        // The dead sink 2 loops on both symbols, which would violate
        // commutativity, but it cannot reach the accepting state.
        let aut = automaton(3, "012222", "1");
        let co = co_reachable_states(&aut);
        assert!(co[0] && co[1] && !co[2]);
        assert_eq!(classify_growth(&aut), GrowthClass::Polynomial);
    }

    #[test]
    fn no_accepting_states_is_polynomial() {
        let aut = automaton(2, "0111", "");
        assert_eq!(classify_growth(&aut), GrowthClass::Polynomial);
    }

    #[test]
    fn zero_loop_language_is_polynomial() {
        // Accepts 0* (only the zero numeral, with leading zeros).
        let aut = automaton(2, "0111", "0");
        let analysis = analyze_growth(&aut);
        assert_eq!(analysis.class, GrowthClass::Polynomial);
        assert_eq!(analysis.examined[0].root_len, 1);
    }
}
