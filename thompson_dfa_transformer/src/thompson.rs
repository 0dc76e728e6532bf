//! Thompson construction: postfix expression to an epsilon-NFA.
//!
//! Every fragment built during one construction draws its state labels from
//! the same [`StateCounter`], so fragments can be unioned without renaming.

use crate::automata::{Automaton, StateId, Symbol, Transition};
use crate::error::BuildError;
use std::collections::BTreeSet;
use thompson_dfa_util::{is_symbol, ALTERNATION, CONCAT, STAR};

/// Allocator of fresh state labels for one construction session.
#[derive(Debug, Default)]
pub struct StateCounter {
    next: u32,
}

impl StateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> StateId {
        let id = StateId(self.next);
        self.next += 1;
        id
    }

    /// Number of labels handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// Two fresh states joined by a single transition on `c`.
pub fn symbol(c: char, counter: &mut StateCounter) -> Automaton {
    let initial = counter.fresh();
    let last = counter.fresh();
    Automaton {
        states: [initial, last].into(),
        alphabet: [c].into(),
        transitions: [Transition::new(initial, Symbol::Char(c), last)].into(),
        initial,
        accepting: [last].into(),
    }
}

/// Union of the parts of `a` and `b`, keeping `a`'s initial state and no
/// accepting states.
fn merge(mut a: Automaton, b: Automaton) -> Automaton {
    a.states.extend(b.states);
    a.alphabet.extend(b.alphabet);
    a.transitions.extend(b.transitions);
    a.accepting.clear();
    a
}

/// Language of `a` or `b`.
pub fn alternate(a: Automaton, b: Automaton, counter: &mut StateCounter) -> Automaton {
    let start = counter.fresh();
    let end = counter.fresh();

    let mut edges = vec![Transition::epsilon(start, a.initial), Transition::epsilon(start, b.initial)];
    edges.extend(a.accepting.iter().chain(&b.accepting).map(|&f| Transition::epsilon(f, end)));

    let mut out = merge(a, b);
    out.states.extend([start, end]);
    out.transitions.extend(edges);
    out.initial = start;
    out.accepting = [end].into();
    out
}

/// Language of `a` followed by `b`. Allocates no states.
pub fn concatenate(a: Automaton, b: Automaton) -> Automaton {
    let edges: Vec<_> = a.accepting.iter().map(|&f| Transition::epsilon(f, b.initial)).collect();
    let accepting = b.accepting.clone();

    let mut out = merge(a, b);
    out.transitions.extend(edges);
    out.accepting = accepting;
    out
}

/// Zero or more repetitions of `a`.
pub fn starring(mut a: Automaton, counter: &mut StateCounter) -> Automaton {
    let start = counter.fresh();
    let end = counter.fresh();

    a.transitions.insert(Transition::epsilon(start, a.initial));
    a.transitions.insert(Transition::epsilon(start, end));
    for &f in &a.accepting {
        a.transitions.insert(Transition::epsilon(f, end));
        a.transitions.insert(Transition::epsilon(f, a.initial));
    }
    a.states.extend([start, end]);
    a.initial = start;
    a.accepting = BTreeSet::from([end]);
    a
}

/// Evaluates a postfix expression into an epsilon-NFA.
pub fn obtain_nfa(postfix: &str) -> Result<Automaton, BuildError> {
    let mut counter = StateCounter::new();
    obtain_nfa_with(postfix, &mut counter)
}

/// Like [`obtain_nfa`], drawing labels from a caller-owned session counter.
pub fn obtain_nfa_with(postfix: &str, counter: &mut StateCounter) -> Result<Automaton, BuildError> {
    let mut stack: Vec<Automaton> = Vec::new();

    for (position, c) in postfix.chars().enumerate() {
        let missing = BuildError::MissingOperand { operator: c, position };
        match c {
            c if is_symbol(c) => stack.push(symbol(c, counter)),
            ALTERNATION => {
                let b = stack.pop().ok_or(missing.clone())?;
                let a = stack.pop().ok_or(missing)?;
                stack.push(alternate(a, b, counter));
            }
            CONCAT => {
                let b = stack.pop().ok_or(missing.clone())?;
                let a = stack.pop().ok_or(missing)?;
                stack.push(concatenate(a, b));
            }
            STAR => {
                let a = stack.pop().ok_or(missing)?;
                stack.push(starring(a, counter));
            }
            character => return Err(BuildError::UnexpectedCharacter { character, position }),
        }
    }

    let nfa = stack.pop().ok_or(BuildError::EmptyExpression)?;
    if !stack.is_empty() {
        return Err(BuildError::DanglingOperands { count: stack.len() + 1 });
    }
    log::debug!(
        "built NFA for `{postfix}` with {} states and {} transitions",
        nfa.states.len(),
        nfa.transitions.len()
    );
    Ok(nfa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: u32) -> StateId {
        StateId(n)
    }

    fn eps(a: u32, b: u32) -> Transition {
        Transition::epsilon(q(a), q(b))
    }

    #[test]
    fn counter_is_monotonic() {
        let mut c = StateCounter::new();
        assert_eq!(c.fresh(), q(0));
        assert_eq!(c.fresh(), q(1));
        assert_eq!(c.allocated(), 2);
    }

    #[test]
    fn symbol_fragment() {
        let mut c = StateCounter::new();
        let a = symbol('a', &mut c);
        assert_eq!(a.initial, q(0));
        assert_eq!(a.accepting, BTreeSet::from([q(1)]));
        assert_eq!(a.transitions, BTreeSet::from([Transition::new(q(0), Symbol::Char('a'), q(1))]));
    }

    #[test]
    fn alternate_fragment() {
        let mut c = StateCounter::new();
        let a = symbol('a', &mut c);
        let b = symbol('b', &mut c);
        let ab = alternate(a, b, &mut c);

        assert_eq!(ab.initial, q(4));
        assert_eq!(ab.accepting, BTreeSet::from([q(5)]));
        assert_eq!(ab.states.len(), 6);
        assert_eq!(ab.alphabet, BTreeSet::from(['a', 'b']));
        for t in [eps(4, 0), eps(4, 2), eps(1, 5), eps(3, 5)] {
            assert!(ab.transitions.contains(&t), "missing {t}");
        }
        assert_eq!(ab.transitions.len(), 6);
        assert!(ab.verify().is_ok());
    }

    #[test]
    fn concatenate_fragment() {
        let mut c = StateCounter::new();
        let a = symbol('a', &mut c);
        let b = symbol('b', &mut c);
        let ab = concatenate(a, b);

        assert_eq!(c.allocated(), 4);
        assert_eq!(ab.initial, q(0));
        assert_eq!(ab.accepting, BTreeSet::from([q(3)]));
        assert!(ab.transitions.contains(&eps(1, 2)));
        assert_eq!(ab.transitions.len(), 3);
    }

    #[test]
    fn starring_fragment() {
        let mut c = StateCounter::new();
        let a = starring(symbol('a', &mut c), &mut c);

        assert_eq!(a.initial, q(2));
        assert_eq!(a.accepting, BTreeSet::from([q(3)]));
        for t in [eps(2, 0), eps(2, 3), eps(1, 3), eps(1, 0)] {
            assert!(a.transitions.contains(&t), "missing {t}");
        }
        assert_eq!(a.transitions.len(), 5);
    }

    #[test]
    fn builds_from_postfix() {
        let nfa = obtain_nfa("ab|*c.").unwrap();
        assert!(nfa.verify().is_ok());
        assert_eq!(nfa.alphabet, BTreeSet::from(['a', 'b', 'c']));
        // a, b, alternation, star, c: two states each
        assert_eq!(nfa.states.len(), 10);
        assert!(!nfa.is_deterministic());
    }

    #[test]
    fn labels_are_unique_across_fragments() {
        let nfa = obtain_nfa("aa.a.").unwrap();
        assert_eq!(nfa.states.len(), 6);
    }

    #[test]
    fn session_counter_continues() {
        let mut c = StateCounter::new();
        let first = obtain_nfa_with("a", &mut c).unwrap();
        let second = obtain_nfa_with("a", &mut c).unwrap();
        assert!(first.states.is_disjoint(&second.states));
    }

    #[test]
    fn rejects_malformed_postfix() {
        assert_eq!(obtain_nfa(""), Err(BuildError::EmptyExpression));
        assert_eq!(obtain_nfa("a|"), Err(BuildError::MissingOperand { operator: '|', position: 1 }));
        assert_eq!(obtain_nfa("."), Err(BuildError::MissingOperand { operator: '.', position: 0 }));
        assert_eq!(obtain_nfa("*"), Err(BuildError::MissingOperand { operator: '*', position: 0 }));
        assert_eq!(obtain_nfa("ab"), Err(BuildError::DanglingOperands { count: 2 }));
        assert_eq!(obtain_nfa("a(*"), Err(BuildError::UnexpectedCharacter { character: '(', position: 1 }));
    }
}
