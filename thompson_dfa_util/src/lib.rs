/// Concatenation operator inserted by the normalizer.
pub const CONCAT: char = '.';
pub const ALTERNATION: char = '|';
pub const STAR: char = '*';

/// Symbols of the expression alphabet.
#[inline(always)]
pub const fn is_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

#[inline(always)]
pub const fn is_operator(c: char) -> bool {
    c == CONCAT || c == ALTERNATION || c == STAR
}

/// Characters allowed anywhere in a raw expression.
#[inline(always)]
pub const fn is_expression_char(c: char) -> bool {
    is_symbol(c) || is_operator(c) || c == '(' || c == ')'
}

/// Whether `c` can be the last character of an operand.
#[inline(always)]
pub const fn ends_operand(c: char) -> bool {
    is_symbol(c) || c == ')' || c == STAR
}

/// Whether `c` can be the first character of an operand.
#[inline(always)]
pub const fn starts_operand(c: char) -> bool {
    is_symbol(c) || c == '('
}

/// Binding strength of an operator on the conversion stack. Anything that is
/// not an operator (notably `(`) binds with 0.
#[inline(always)]
pub const fn precedence(c: char) -> u8 {
    match c {
        STAR => 3,
        CONCAT => 2,
        ALTERNATION => 1,
        _ => 0,
    }
}

/// A deterministic automaton laid out as index tables, cheap enough to be
/// evaluated in const context.
///
/// `transitions[s]` lists the `(symbol, destination)` pairs leaving state `s`.
/// A missing entry rejects.
#[derive(Debug, Copy, Clone)]
pub struct TableDfa<'a> {
    initial: usize,
    accepting: &'a [bool],
    transitions: &'a [&'a [(u8, usize)]],
}

impl<'a> TableDfa<'a> {
    #[inline(always)]
    pub const fn new(initial: usize, accepting: &'a [bool], transitions: &'a [&'a [(u8, usize)]]) -> Self {
        Self { initial, accepting, transitions }
    }

    #[inline(always)]
    pub const fn state_count(&self) -> usize {
        self.accepting.len()
    }

    /// Runs `input` through the table and reports whether it ends in an
    /// accepting state.
    pub const fn test(&self, input: &str) -> bool {
        let bytes = input.as_bytes();
        let mut state = self.initial;
        let mut i = 0;
        while i < bytes.len() {
            match self.step(state, bytes[i]) {
                Some(next) => state = next,
                None => return false,
            }
            i += 1;
        }
        self.accepting[state]
    }

    #[inline(always)]
    const fn step(&self, state: usize, symbol: u8) -> Option<usize> {
        let row = self.transitions[state];
        let mut j = 0;
        while j < row.len() {
            let (s, destination) = row[j];
            if s == symbol {
                return Some(destination);
            }
            j += 1;
        }
        None
    }
}
