use anyhow::{bail, Context, Result};
use itertools::Itertools;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thompson_dfa_transformer::report::parse_automaton;
use thompson_dfa_transformer::{compile, Automaton, Compiled, SubsetTable};
use thompson_dfa_util::is_expression_char;

/// Drops every character that cannot appear in an expression.
pub fn sanitize(line: &str) -> String {
    line.chars()
        .filter(|&c| {
            let keep = is_expression_char(c);
            if !keep {
                log::warn!("invalid character `{c}` removed from expression");
            }
            keep
        })
        .collect()
}

/// First line of `path`, sanitized.
pub fn read_expression(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot open {}", path.display()))?;
    let expression = sanitize(text.lines().next().unwrap_or_default());
    if expression.is_empty() {
        bail!("{} holds no expression", path.display());
    }
    Ok(expression)
}

/// Loads a report, prints the verification outcome and returns whether the
/// automaton is valid.
pub fn verify_report(path: &Path, out: &mut impl Write) -> Result<bool> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot open {}", path.display()))?;
    let automaton = parse_automaton(&text).with_context(|| format!("cannot read {}", path.display()))?;
    match automaton.verify() {
        Ok(()) => {
            writeln!(out, "{} is a valid automaton", path.display())?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "{} is invalid: {e}", path.display())?;
            Ok(false)
        }
    }
}

/// One state per line with its outgoing moves.
fn transition_table(automaton: &Automaton) -> String {
    automaton
        .states()
        .iter()
        .map(|&s| {
            let marks = match (s == *automaton.initial(), automaton.is_accepting(s)) {
                (true, true) => "->*",
                (true, false) => "-> ",
                (false, true) => "  *",
                (false, false) => "   ",
            };
            let moves = automaton.transitions_from(s).map(|t| format!("{} -> {}", t.symbol, t.destination)).join("  ");
            format!("{marks} {:<5}| {moves}", s.to_string())
        })
        .join("\n")
}

fn subset_lines(subsets: &SubsetTable) -> String {
    subsets
        .iter()
        .map(|(label, set)| format!("{label} = {{{}}}", set.iter().join(", ")))
        .join("\n")
}

/// A compiled expression plus where its reports go.
pub struct Session {
    compiled: Compiled,
    nfa_out: PathBuf,
    dfa_out: PathBuf,
}

impl Session {
    pub fn load(expression: &Path, nfa_out: PathBuf, dfa_out: PathBuf) -> Result<Self> {
        let expression = read_expression(expression)?;
        Self::new(&expression, nfa_out, dfa_out)
    }

    pub fn new(expression: &str, nfa_out: PathBuf, dfa_out: PathBuf) -> Result<Self> {
        let compiled = compile(expression).with_context(|| format!("cannot compile `{expression}`"))?;
        Ok(Self { compiled, nfa_out, dfa_out })
    }

    pub fn check(&self, word: &str) -> bool {
        self.compiled.check_word(word)
    }

    fn save(&self, automaton: &Automaton, path: &Path, out: &mut impl Write) -> Result<()> {
        write!(out, "{automaton}")?;
        writeln!(out, "{}", transition_table(automaton))?;
        fs::write(path, automaton.to_string()).with_context(|| format!("cannot write {}", path.display()))?;
        writeln!(out, "saved to {}", path.display())?;
        Ok(())
    }

    /// Numbered menu over `input` until option 6 or end of input. File
    /// errors are reported and the loop goes on.
    pub fn run_menu(&self, mut input: impl BufRead, mut out: impl Write) -> Result<()> {
        loop {
            writeln!(out, "1 - Show the expression")?;
            writeln!(out, "2 - Show the postfix form")?;
            writeln!(out, "3 - Show and save the NFA")?;
            writeln!(out, "4 - Show and save the DFA")?;
            writeln!(out, "5 - Check a word")?;
            writeln!(out, "6 - Exit")?;
            write!(out, "Choose an option: ")?;
            out.flush()?;

            let Some(choice) = read_line(&mut input)? else { break };
            match choice.trim() {
                "1" => writeln!(out, "Expression: {}", self.compiled.expression())?,
                "2" => writeln!(out, "Postfix form: {}", self.compiled.postfix())?,
                "3" => {
                    writeln!(out, "NFA for {}:", self.compiled.postfix())?;
                    if let Err(e) = self.save(self.compiled.nfa(), &self.nfa_out, &mut out) {
                        writeln!(out, "{e:#}")?;
                    }
                }
                "4" => {
                    writeln!(out, "DFA:")?;
                    if let Err(e) = self.save(self.compiled.dfa(), &self.dfa_out, &mut out) {
                        writeln!(out, "{e:#}")?;
                    }
                    writeln!(out, "{}", subset_lines(self.compiled.subsets()))?;
                }
                "5" => {
                    write!(out, "Word to check: ")?;
                    out.flush()?;
                    let Some(word) = read_line(&mut input)? else { break };
                    let word = word.trim();
                    let verdict = if self.check(word) { "is accepted" } else { "is not accepted" };
                    writeln!(out, "The word `{word}` {verdict}")?;
                }
                "6" => {
                    writeln!(out, "Bye")?;
                    break;
                }
                _ => writeln!(out, "Invalid option, try again")?,
            }
        }
        Ok(())
    }
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    Ok(match input.read_line(&mut line)? {
        0 => None,
        _ => Some(line),
    })
}
