//! Epsilon closures and the subset construction.

use crate::automata::{Automaton, StateId, Symbol, Transition};
use crate::thompson::StateCounter;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Direct epsilon successors of each state.
pub type EpsilonMap = BTreeMap<StateId, Vec<StateId>>;

/// Set of NFA states each DFA state stands for, keyed by DFA label.
pub type SubsetTable = BTreeMap<StateId, BTreeSet<StateId>>;

pub fn epsilon_map(nfa: &Automaton) -> EpsilonMap {
    let mut map = EpsilonMap::new();
    for t in nfa.transitions().iter().filter(|t| t.symbol.is_epsilon()) {
        map.entry(t.source).or_default().push(t.destination);
    }
    map
}

/// States reachable from `state` through epsilon transitions alone, `state`
/// included.
pub fn lambda_closure(state: StateId, epsilon: &EpsilonMap) -> BTreeSet<StateId> {
    let mut closure = BTreeSet::from([state]);
    let mut queue = VecDeque::from([state]);

    while let Some(current) = queue.pop_front() {
        for &next in epsilon.get(&current).into_iter().flatten() {
            if closure.insert(next) {
                queue.push_back(next);
            }
        }
    }
    closure
}

/// Closure of every state in `states`.
pub fn closure_of_set(states: &BTreeSet<StateId>, epsilon: &EpsilonMap) -> BTreeSet<StateId> {
    states.iter().flat_map(|&s| lambda_closure(s, epsilon)).collect()
}

/// Subset construction. The result is deterministic but may be partial: a
/// state has no transition on a symbol when no NFA state in its set can move
/// on it.
pub fn convert_to_dfa(nfa: &Automaton) -> Automaton {
    subset_construction(nfa).0
}

/// [`convert_to_dfa`], also returning the NFA states behind each DFA state.
pub fn subset_construction(nfa: &Automaton) -> (Automaton, SubsetTable) {
    let epsilon = epsilon_map(nfa);

    // NFA destinations on each (state, symbol)
    let mut moves: BTreeMap<(StateId, char), Vec<StateId>> = BTreeMap::new();
    for t in nfa.transitions() {
        if let Symbol::Char(c) = t.symbol {
            moves.entry((t.source, c)).or_default().push(t.destination);
        }
    }

    let mut counter = StateCounter::new();
    let mut labels: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();
    let mut states = BTreeSet::new();
    let mut transitions = BTreeSet::new();
    let mut accepting = BTreeSet::new();

    let start = lambda_closure(*nfa.initial(), &epsilon);
    let initial = counter.fresh();
    labels.insert(start.clone(), initial);
    states.insert(initial);

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let label = labels[&current];
        if !current.is_disjoint(nfa.accepting()) {
            accepting.insert(label);
        }

        for &c in nfa.alphabet() {
            let target: BTreeSet<StateId> = current
                .iter()
                .filter_map(|&s| moves.get(&(s, c)))
                .flatten()
                .flat_map(|&d| lambda_closure(d, &epsilon))
                .collect();
            if target.is_empty() {
                continue;
            }

            let destination = match labels.get(&target) {
                Some(&existing) => existing,
                None => {
                    let fresh = counter.fresh();
                    labels.insert(target.clone(), fresh);
                    states.insert(fresh);
                    queue.push_back(target);
                    fresh
                }
            };
            transitions.insert(Transition::new(label, Symbol::Char(c), destination));
        }
    }

    log::debug!(
        "subset construction: {} NFA states became {} DFA states",
        nfa.states().len(),
        states.len()
    );

    let dfa = Automaton::new(states, nfa.alphabet().clone(), transitions, initial, accepting);
    let table = labels.into_iter().map(|(set, label)| (label, set)).collect();
    (dfa, table)
}

impl Automaton {
    /// Set-based simulation that follows epsilon transitions, valid for any
    /// automaton.
    pub fn simulate(&self, word: &str) -> bool {
        let epsilon = epsilon_map(self);
        let mut current = lambda_closure(self.initial, &epsilon);

        for c in word.chars() {
            let reached: BTreeSet<StateId> = current
                .iter()
                .flat_map(|&s| self.transitions_from(s))
                .filter(|t| t.symbol == Symbol::Char(c))
                .map(|t| t.destination)
                .collect();
            current = closure_of_set(&reached, &epsilon);
            if current.is_empty() {
                return false;
            }
        }
        !current.is_disjoint(&self.accepting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize, obtain_nfa, to_postfix};

    fn q(n: u32) -> StateId {
        StateId(n)
    }

    fn nfa(expr: &str) -> Automaton {
        obtain_nfa(&to_postfix(&normalize(expr)).unwrap()).unwrap()
    }

    #[test]
    fn closure_follows_chains_and_cycles() {
        let epsilon: EpsilonMap = [(q(0), vec![q(1)]), (q(1), vec![q(2), q(0)]), (q(3), vec![q(0)])].into();
        assert_eq!(lambda_closure(q(0), &epsilon), BTreeSet::from([q(0), q(1), q(2)]));
        assert_eq!(lambda_closure(q(2), &epsilon), BTreeSet::from([q(2)]));
        assert_eq!(lambda_closure(q(3), &epsilon), BTreeSet::from([q(0), q(1), q(2), q(3)]));
    }

    #[test]
    fn closure_is_idempotent() {
        let n = nfa("(a|b*)*c");
        let epsilon = epsilon_map(&n);
        for &s in n.states() {
            let once = lambda_closure(s, &epsilon);
            assert_eq!(closure_of_set(&once, &epsilon), once);
        }
    }

    #[test]
    fn dfa_for_alternation() {
        let dfa = convert_to_dfa(&nfa("a|b"));
        assert!(dfa.is_deterministic());
        assert!(dfa.verify().is_ok());
        assert_eq!(*dfa.initial(), q(0));
        assert_eq!(dfa.states().len(), 3);
        assert!(dfa.check_word("a"));
        assert!(dfa.check_word("b"));
        assert!(!dfa.check_word("ab"));
        assert!(!dfa.check_word(""));
    }

    #[test]
    fn dfa_is_partial() {
        let dfa = convert_to_dfa(&nfa("ab"));
        assert_eq!(dfa.states().len(), 3);
        // no sink state: q0 has no move on b
        assert_eq!(dfa.step(q(0), 'b'), None);
        assert!(dfa.check_word("ab"));
        assert!(!dfa.check_word("ba"));
    }

    #[test]
    fn labels_follow_discovery_order() {
        let (dfa, table) = subset_construction(&nfa("ab"));
        assert_eq!(dfa.step(q(0), 'a'), Some(q(1)));
        assert_eq!(dfa.step(q(1), 'b'), Some(q(2)));
        assert_eq!(dfa.accepting(), &BTreeSet::from([q(2)]));
        // q0 is exactly the closure of the NFA start
        assert_eq!(table[&q(0)], BTreeSet::from([q(0)]));
        assert_eq!(table[&q(1)], BTreeSet::from([q(1), q(2)]));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn star_accepts_empty_word() {
        let dfa = convert_to_dfa(&nfa("a*"));
        assert!(dfa.is_accepting(*dfa.initial()));
        for w in ["", "a", "aa", "aaa"] {
            assert!(dfa.check_word(w), "{w}");
        }
        assert!(!dfa.check_word("b"));
    }

    #[test]
    fn simulate_agrees_between_nfa_and_dfa() {
        let n = nfa("(a|b)*c");
        let d = convert_to_dfa(&n);
        for w in ["c", "ac", "abac", "ab", "", "cc", "bbbc"] {
            assert_eq!(n.simulate(w), d.check_word(w), "{w}");
            assert_eq!(d.simulate(w), d.check_word(w), "{w}");
        }
    }
}
