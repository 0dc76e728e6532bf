//! Reading automata back from the text dump produced by `Display`.
//!
//! Only the layout is checked here. A parsed automaton may still violate the
//! data-model invariants; run [`Automaton::verify`] before using it.

use crate::automata::{Automaton, StateId, Symbol, Transition, EPSILON_MARK};
use crate::error::ReportError;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char as cchar, digit1, line_ending, multispace0, satisfy, space0, space1};
use nom::combinator::{all_consuming, map, map_res, value, verify};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;
use std::collections::BTreeSet;

type NResult<'a, T> = IResult<&'a str, T>;

/// `q<n>` with `n` written without leading zeros, so every label has exactly
/// one spelling.
fn state_id(input: &str) -> NResult<StateId> {
    let canonical = verify(digit1, |digits: &str| digits == "0" || !digits.starts_with('0'));
    map(preceded(cchar('q'), map_res(canonical, str::parse::<u32>)), StateId)(input)
}

fn symbol(input: &str) -> NResult<Symbol> {
    alt((
        value(Symbol::Epsilon, cchar(EPSILON_MARK)),
        map(satisfy(|c| !c.is_whitespace() && c != '}' && c != ','), Symbol::Char),
    ))(input)
}

/// `<label>:` followed by space-separated items up to the end of the line.
fn labelled_list<'a, T, F>(label: &'static str, item: F) -> impl FnMut(&'a str) -> NResult<'a, Vec<T>>
where
    F: FnMut(&'a str) -> NResult<'a, T>,
{
    delimited(tag(label), many0(preceded(space1, item)), terminated(space0, line_ending))
}

fn transition(input: &str) -> NResult<Transition> {
    map(
        tuple((
            cchar('{'),
            state_id,
            tag(", "),
            symbol,
            cchar('}'),
            tag(" -> "),
            state_id,
            space0,
            line_ending,
        )),
        |(_, source, _, symbol, _, _, destination, _, _)| Transition::new(source, symbol, destination),
    )(input)
}

fn automaton(input: &str) -> NResult<Automaton> {
    let (input, states) = labelled_list("States:", state_id)(input)?;
    let (input, alphabet) = labelled_list("Alphabet:", satisfy(|c| c.is_ascii_alphanumeric()))(input)?;
    let (input, initial) = delimited(tuple((tag("Initial State:"), space1)), state_id, terminated(space0, line_ending))(input)?;
    let (input, accepting) = labelled_list("Final States:", state_id)(input)?;
    let (input, transitions) = preceded(terminated(tag("Transitions:"), line_ending), many0(transition))(input)?;

    Ok((
        input,
        Automaton::new(
            states.into_iter().collect::<BTreeSet<_>>(),
            alphabet.into_iter().collect(),
            transitions.into_iter().collect(),
            initial,
            accepting.into_iter().collect(),
        ),
    ))
}

/// Parses the five-section dump written by `Automaton`'s `Display`.
pub fn parse_automaton(text: &str) -> Result<Automaton, ReportError> {
    all_consuming(terminated(automaton, multispace0))(text)
        .map(|(_, a)| a)
        .map_err(|e| ReportError::Malformed(e.to_string()))
}
