use crate::error::PostfixError;
use thompson_dfa_util::{ends_operand, is_operator, is_symbol, precedence, starts_operand, CONCAT};

/// Makes concatenation explicit by inserting `.` between every pair of
/// adjacent characters where the first can end an operand and the second can
/// start one. Never fails; malformed input passes through.
pub fn normalize(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() * 2);
    let mut chars = expr.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if let Some(&next) = chars.peek() {
            if ends_operand(c) && starts_operand(next) {
                out.push(CONCAT);
            }
        }
    }
    out
}

/// Shunting-yard rewrite of a normalized infix expression into postfix.
///
/// `*` binds tighter than `.`, which binds tighter than `|`; operators of
/// equal precedence associate to the left.
pub fn to_postfix(expr: &str) -> Result<String, PostfixError> {
    let mut operators: Vec<char> = Vec::new();
    let mut out = String::with_capacity(expr.len());
    let mut open = 0usize;

    for (position, c) in expr.chars().enumerate() {
        match c {
            c if is_symbol(c) => out.push(c),
            '(' => {
                operators.push(c);
                open += 1;
            }
            ')' => {
                loop {
                    match operators.pop() {
                        Some('(') => break,
                        Some(op) => out.push(op),
                        None => return Err(PostfixError::UnmatchedClose { position }),
                    }
                }
                open -= 1;
            }
            c if is_operator(c) => {
                while let Some(&top) = operators.last() {
                    if precedence(top) < precedence(c) {
                        break;
                    }
                    out.push(top);
                    operators.pop();
                }
                operators.push(c);
            }
            character => return Err(PostfixError::InvalidCharacter { character, position }),
        }
    }

    if open != 0 {
        return Err(PostfixError::UnmatchedOpen);
    }
    while let Some(op) = operators.pop() {
        if op == '(' {
            return Err(PostfixError::UnmatchedOpen);
        }
        out.push(op);
    }

    log::debug!("postfix of `{expr}` is `{out}`");
    Ok(out)
}

/// Index in `expr` of the character found at `position` in `normalize(expr)`.
fn raw_position(expr: &str, position: usize) -> usize {
    let mut normalized = 0;
    let mut chars = expr.chars().enumerate().peekable();
    while let Some((index, c)) = chars.next() {
        if normalized == position {
            return index;
        }
        normalized += 1;
        if let Some(&(_, next)) = chars.peek() {
            if ends_operand(c) && starts_operand(next) {
                normalized += 1;
            }
        }
    }
    position
}

/// [`normalize`] followed by [`to_postfix`]. Error positions index into
/// `expr` rather than its normalized form.
pub fn infix_to_postfix(expr: &str) -> Result<String, PostfixError> {
    to_postfix(&normalize(expr)).map_err(|e| match e {
        PostfixError::UnmatchedClose { position } => {
            PostfixError::UnmatchedClose { position: raw_position(expr, position) }
        }
        PostfixError::InvalidCharacter { character, position } => {
            PostfixError::InvalidCharacter { character, position: raw_position(expr, position) }
        }
        PostfixError::UnmatchedOpen => PostfixError::UnmatchedOpen,
    })
}
