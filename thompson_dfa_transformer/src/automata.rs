use crate::error::AutomatonError;
use derive_getters::Getters;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Label of an automaton state, rendered as `q<n>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u32);

impl StateId {
    pub const MIN: StateId = StateId(0);
    pub const MAX: StateId = StateId(u32::MAX);
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Rendering of the epsilon marker in dumps.
pub const EPSILON_MARK: char = 'ε';

/// A transition label. Epsilon orders after every character.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Char(char),
    Epsilon,
}

impl Symbol {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Symbol::Char(c) => Some(*c),
            Symbol::Epsilon => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::Epsilon => write!(f, "{EPSILON_MARK}"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    pub source: StateId,
    pub symbol: Symbol,
    pub destination: StateId,
}

impl Transition {
    pub fn new(source: StateId, symbol: Symbol, destination: StateId) -> Self {
        Self { source, symbol, destination }
    }

    pub fn epsilon(source: StateId, destination: StateId) -> Self {
        Self::new(source, Symbol::Epsilon, destination)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}, {}}} -> {}", self.source, self.symbol, self.destination)
    }
}

/// A finite automaton, deterministic or not.
///
/// Values produced by the construction pipeline always satisfy the invariants
/// checked by [`Automaton::verify`]. Automata assembled through
/// [`Automaton::new`] or loaded from a report are not checked until `verify`
/// is called.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Automaton {
    pub(crate) states: BTreeSet<StateId>,
    /// Input symbols, never containing the epsilon marker.
    pub(crate) alphabet: BTreeSet<char>,
    pub(crate) transitions: BTreeSet<Transition>,
    pub(crate) initial: StateId,
    pub(crate) accepting: BTreeSet<StateId>,
}

impl Automaton {
    pub fn new(
        states: BTreeSet<StateId>,
        alphabet: BTreeSet<char>,
        transitions: BTreeSet<Transition>,
        initial: StateId,
        accepting: BTreeSet<StateId>,
    ) -> Self {
        Self { states, alphabet, transitions, initial, accepting }
    }

    /// Checks the data-model invariants and returns the first violation, in
    /// the order: initial state, accepting states, then each transition's
    /// source, destination and symbol.
    pub fn verify(&self) -> Result<(), AutomatonError> {
        if !self.states.contains(&self.initial) {
            return Err(AutomatonError::InvalidInitialState(self.initial));
        }
        if let Some(state) = self.accepting.iter().find(|s| !self.states.contains(*s)) {
            return Err(AutomatonError::InvalidAcceptingState(*state));
        }
        for t in &self.transitions {
            if !self.states.contains(&t.source) {
                return Err(AutomatonError::InvalidTransitionSource(t.source));
            }
            if !self.states.contains(&t.destination) {
                return Err(AutomatonError::InvalidTransitionDestination(t.destination));
            }
            if let Symbol::Char(c) = t.symbol {
                if !self.alphabet.contains(&c) {
                    return Err(AutomatonError::InvalidTransitionSymbol { state: t.source, symbol: t.symbol });
                }
            }
        }
        Ok(())
    }

    /// Boolean form of [`Automaton::verify`]; the violation goes to the log.
    pub fn is_valid(&self) -> bool {
        match self.verify() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }

    /// Transitions leaving `state`, in symbol order.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = &Transition> + '_ {
        let lo = Transition::new(state, Symbol::Char('\0'), StateId::MIN);
        let hi = Transition::new(state, Symbol::Epsilon, StateId::MAX);
        self.transitions.range(lo..=hi)
    }

    /// First destination reachable from `state` on `symbol`.
    pub fn step(&self, state: StateId, symbol: char) -> Option<StateId> {
        let lo = Transition::new(state, Symbol::Char(symbol), StateId::MIN);
        let hi = Transition::new(state, Symbol::Char(symbol), StateId::MAX);
        self.transitions.range(lo..=hi).next().map(|t| t.destination)
    }

    /// No epsilon transitions and at most one transition per state and symbol.
    pub fn is_deterministic(&self) -> bool {
        !self.transitions.iter().any(|t| t.symbol.is_epsilon())
            && self
                .transitions
                .iter()
                .tuple_windows()
                .all(|(a, b)| (a.source, a.symbol) != (b.source, b.symbol))
    }

    /// Runs `word` through a deterministic automaton. Unknown symbols and
    /// missing transitions reject.
    ///
    /// The result is meaningless on a nondeterministic automaton; use
    /// [`Automaton::simulate`] there.
    pub fn check_word(&self, word: &str) -> bool {
        let mut current = self.initial;
        for symbol in word.chars() {
            if !self.alphabet.contains(&symbol) {
                log::debug!("symbol `{symbol}` is not in the alphabet");
                return false;
            }
            match self.step(current, symbol) {
                Some(next) => current = next,
                None => {
                    log::debug!("no transition from {current} on `{symbol}`");
                    return false;
                }
            }
        }
        self.is_accepting(current)
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "States: {}", self.states.iter().join(" "))?;
        writeln!(f, "Alphabet: {}", self.alphabet.iter().join(" "))?;
        writeln!(f, "Initial State: {}", self.initial)?;
        writeln!(f, "Final States: {}", self.accepting.iter().join(" "))?;
        writeln!(f, "Transitions:")?;
        for t in &self.transitions {
            writeln!(f, "{t}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: u32) -> StateId {
        StateId(n)
    }

    fn ab_automaton() -> Automaton {
        // q0 -a-> q1 -b-> q2
        Automaton::new(
            [q(0), q(1), q(2)].into(),
            ['a', 'b'].into(),
            [
                Transition::new(q(0), Symbol::Char('a'), q(1)),
                Transition::new(q(1), Symbol::Char('b'), q(2)),
            ]
            .into(),
            q(0),
            [q(2)].into(),
        )
    }

    #[test]
    fn check_word_follows_transitions() {
        let a = ab_automaton();
        assert!(a.check_word("ab"));
        assert!(!a.check_word("a"));
        assert!(!a.check_word("abb"));
        assert!(!a.check_word("ac"));
        assert!(!a.check_word(""));
    }

    #[test]
    fn verify_accepts_well_formed() {
        assert_eq!(ab_automaton().verify(), Ok(()));
        assert!(ab_automaton().is_valid());
    }

    #[test]
    fn verify_reports_initial_state() {
        let mut a = ab_automaton();
        a.initial = q(9);
        assert_eq!(a.verify(), Err(AutomatonError::InvalidInitialState(q(9))));
        assert!(!a.is_valid());
    }

    #[test]
    fn verify_reports_accepting_state() {
        let mut a = ab_automaton();
        a.accepting.insert(q(7));
        assert_eq!(a.verify(), Err(AutomatonError::InvalidAcceptingState(q(7))));
    }

    #[test]
    fn verify_reports_transition_endpoints() {
        let mut a = ab_automaton();
        a.transitions.insert(Transition::new(q(5), Symbol::Char('a'), q(0)));
        assert_eq!(a.verify(), Err(AutomatonError::InvalidTransitionSource(q(5))));

        let mut a = ab_automaton();
        a.transitions.insert(Transition::new(q(0), Symbol::Char('b'), q(6)));
        assert_eq!(a.verify(), Err(AutomatonError::InvalidTransitionDestination(q(6))));
    }

    #[test]
    fn verify_reports_symbol_but_allows_epsilon() {
        let mut a = ab_automaton();
        a.transitions.insert(Transition::epsilon(q(0), q(2)));
        assert_eq!(a.verify(), Ok(()));

        a.transitions.insert(Transition::new(q(2), Symbol::Char('c'), q(0)));
        assert_eq!(
            a.verify(),
            Err(AutomatonError::InvalidTransitionSymbol { state: q(2), symbol: Symbol::Char('c') })
        );
    }

    #[test]
    fn determinism() {
        let mut a = ab_automaton();
        assert!(a.is_deterministic());
        a.transitions.insert(Transition::new(q(0), Symbol::Char('a'), q(2)));
        assert!(!a.is_deterministic());

        let mut a = ab_automaton();
        a.transitions.insert(Transition::epsilon(q(2), q(0)));
        assert!(!a.is_deterministic());
    }

    #[test]
    fn transitions_from_is_scoped_to_state() {
        let mut a = ab_automaton();
        a.transitions.insert(Transition::epsilon(q(1), q(0)));
        let out: Vec<_> = a.transitions_from(q(1)).copied().collect();
        assert_eq!(
            out,
            vec![Transition::new(q(1), Symbol::Char('b'), q(2)), Transition::epsilon(q(1), q(0))]
        );
    }

    #[test]
    fn display_lists_all_fields() {
        let text = ab_automaton().to_string();
        assert_eq!(
            text,
            "States: q0 q1 q2\n\
             Alphabet: a b\n\
             Initial State: q0\n\
             Final States: q2\n\
             Transitions:\n\
             {q0, a} -> q1\n\
             {q1, b} -> q2\n"
        );
    }
}
