//! Strongly-connected-component decomposition of the transition graph.
//!
//! Tarjan's algorithm over the automaton's adjacency view, run with an
//! explicit frame stack so the traversal depth never depends on the call
//! stack. Component ids are opaque beyond equality: two states share an id
//! iff they are mutually reachable.

use crate::automaton::StateId;

/// Identifier of a strongly connected component.
pub type ComponentId = usize;

const UNVISITED: usize = usize::MAX;

/// The SCC partition of a transition graph.
#[derive(Debug, Clone)]
pub struct SccLabeling {
    component: Vec<ComponentId>,
    count: usize,
}

impl SccLabeling {
    /// Component id of a state.
    pub fn id(&self, state: StateId) -> ComponentId {
        self.component[state]
    }

    /// Whether two states are in the same component.
    pub fn same_component(&self, a: StateId, b: StateId) -> bool {
        self.component[a] == self.component[b]
    }

    /// Number of distinct components.
    pub fn count(&self) -> usize {
        self.count
    }

    /// All states labeled with `id`.
    pub fn members(&self, id: ComponentId) -> impl Iterator<Item = StateId> + '_ {
        self.component
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == id)
            .map(|(state, _)| state)
    }
}

/// Label every node of `adj` with its strongly connected component.
///
/// Single pass, linear in nodes plus edges. Components close in reverse
/// topological order of the condensation; self-loops and isolated nodes come
/// out as ordinary singleton components.
pub fn decompose(adj: &[Vec<StateId>]) -> SccLabeling {
    let n = adj.len();
    let mut discovery = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut component = vec![UNVISITED; n];
    let mut on_stack = vec![false; n];
    let mut open: Vec<StateId> = Vec::new();
    let mut timer = 0usize;
    let mut count = 0usize;

    // Explicit DFS frames: (node, index of the next successor to visit).
    let mut frames: Vec<(StateId, usize)> = Vec::with_capacity(n);

    for root in 0..n {
        if discovery[root] != UNVISITED {
            continue;
        }
        frames.push((root, 0));
        while let Some(&(v, next)) = frames.last() {
            if discovery[v] == UNVISITED {
                discovery[v] = timer;
                low[v] = timer;
                timer += 1;
                open.push(v);
                on_stack[v] = true;
            }
            if next < adj[v].len() {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                let w = adj[v][next];
                if discovery[w] == UNVISITED {
                    frames.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(discovery[w]);
                }
            } else {
                frames.pop();
                if low[v] == discovery[v] {
                    // v closes its component: everything stacked above it
                    // (inclusive) is mutually reachable with v.
                    while let Some(w) = open.pop() {
                        on_stack[w] = false;
                        component[w] = count;
                        if w == v {
                            break;
                        }
                    }
                    count += 1;
                }
                if let Some(&mut (parent, _)) = frames.last_mut() {
                    low[parent] = low[parent].min(low[v]);
                }
            }
        }
    }

    SccLabeling { component, count }
}
