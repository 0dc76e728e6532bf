//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "thompson_dfa")]
#[command(about = "Compile a regular expression into an NFA and a DFA and test words against it")]
#[command(version)]
pub struct Cli {
    /// File whose first line holds the expression
    #[arg(short, long, global = true, default_value = "expression.txt")]
    pub expression: PathBuf,

    /// Where the NFA report is saved
    #[arg(long, global = true, default_value = "outNFA.txt")]
    pub nfa_out: PathBuf,

    /// Where the DFA report is saved
    #[arg(long, global = true, default_value = "outDFA.txt")]
    pub dfa_out: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu (the default)
    Menu,

    /// Test words against the DFA
    Check {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Load an automaton report and check its invariants
    Verify {
        report: PathBuf,
    },

    /// Time the compile-time DFA, the runtime DFA and the regex crate
    Bench {
        #[arg(short, long, default_value = "1000000")]
        runs: usize,
    },
}
