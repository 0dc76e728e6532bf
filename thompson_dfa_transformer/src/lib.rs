//! Regular expressions over an alphanumeric alphabet compiled to finite
//! automata: explicit concatenation, shunting-yard postfix conversion,
//! Thompson construction and subset construction.

use derive_getters::Getters;

pub mod automata;
pub mod error;
pub mod regex;
pub mod report;
pub mod subset;
pub mod thompson;

pub use automata::{Automaton, StateId, Symbol, Transition};
pub use error::{AutomatonError, BuildError, CompileError, PostfixError, ReportError};
pub use regex::{infix_to_postfix, normalize, to_postfix};
pub use subset::{convert_to_dfa, lambda_closure, subset_construction, SubsetTable};
pub use thompson::{obtain_nfa, StateCounter};

/// Every stage of one compiled expression.
#[derive(Debug, Clone, Getters)]
pub struct Compiled {
    expression: String,
    postfix: String,
    nfa: Automaton,
    dfa: Automaton,
    /// NFA states behind each DFA state.
    subsets: SubsetTable,
}

impl Compiled {
    /// Whether the expression's language contains `word`.
    pub fn check_word(&self, word: &str) -> bool {
        self.dfa.check_word(word)
    }
}

/// Runs the whole pipeline on an infix expression.
pub fn compile(expression: &str) -> Result<Compiled, CompileError> {
    let postfix = infix_to_postfix(expression)?;
    let nfa = obtain_nfa(&postfix)?;
    let (dfa, subsets) = subset_construction(&nfa);
    Ok(Compiled { expression: expression.to_owned(), postfix, nfa, dfa, subsets })
}
