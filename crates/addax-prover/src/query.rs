//! Walnut query rendering.
//!
//! The automaton is published to Walnut as the word automaton `LL`; queries
//! are first-order sentences over it, submitted as `eval` commands whose
//! boolean outcome lands in a result file named after the query.

use std::fmt::Write as _;

use addax_automata::Automaton;

/// A first-order question for the external prover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProverQuery {
    /// Does every accepted integer divide evenly by `divisor`?
    DividesAll { divisor: u64 },
    /// Can every represented integer (every sufficiently large one, for the
    /// asymptotic variant) be written as a sum of at most `summands`
    /// accepted values, with zero as a valid non-contributing summand?
    BasisOrder { summands: usize, asymptotic: bool },
}

impl ProverQuery {
    /// Name of the result file the prover writes for this query, unique per
    /// automaton via its canonical description.
    pub fn result_name(&self, canonical: &str) -> String {
        match self {
            ProverQuery::DividesAll { divisor } => format!("gcd{divisor}_{canonical}"),
            ProverQuery::BasisOrder { summands, .. } => format!("ord{summands}_{canonical}"),
        }
    }

    /// The Walnut `eval` command line for this query, newline-terminated.
    pub fn eval_command(&self, canonical: &str) -> String {
        let name = self.result_name(canonical);
        match self {
            ProverQuery::DividesAll { divisor } => {
                format!("eval {name} \"A n (LL[n]=@1)=>(E t (n={divisor}*t))\":\n")
            }
            ProverQuery::BasisOrder {
                summands,
                asymptotic,
            } => {
                let mut variables = String::new();
                let mut membership = String::new();
                let mut sum = String::new();
                for i in 0..*summands {
                    let _ = write!(variables, "x{i}");
                    let _ = write!(membership, "((LL[x{i}]=@1)|(x{i}=0))");
                    let _ = write!(sum, "x{i}");
                    if i != summands - 1 {
                        variables.push(',');
                        membership.push('&');
                        sum.push('+');
                    }
                }
                if *asymptotic {
                    format!(
                        "eval {name} \"E m (A n (n>=m)=>(E {variables} {membership}&(n={sum})))\":\n"
                    )
                } else {
                    format!("eval {name} \"A n (E {variables} {membership}&(n={sum}))\":\n")
                }
            }
        }
    }
}

/// The Walnut word-automaton file body for `aut`: the msd numeration header,
/// then one output line and one transition line per symbol for every state.
pub fn word_automaton_text(aut: &Automaton) -> String {
    let mut text = format!("msd_{}\n", aut.alphabet_size());
    for state in 0..aut.state_count() {
        let output = if aut.is_accepting(state) { 1 } else { 0 };
        let _ = writeln!(text, "{state} {output}");
        for symbol in 0..aut.alphabet_size() {
            let _ = writeln!(text, "{symbol} -> {}", aut.step(state, symbol));
        }
    }
    text
}
