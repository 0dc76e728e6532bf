use crate::args::{Cli, Commands};
use crate::session::Session;
use anyhow::Result;
use clap::Parser;
use std::io;
use std::process::ExitCode;

mod args;
mod bench;
mod session;

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Menu);

    match command {
        Commands::Verify { report } => {
            let valid = session::verify_report(&report, &mut io::stdout())?;
            return Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Commands::Bench { runs } => bench::run(runs)?,
        Commands::Check { words } => {
            let session = Session::load(&cli.expression, cli.nfa_out, cli.dfa_out)?;
            for word in words {
                let verdict = if session.check(&word) { "accepted" } else { "rejected" };
                println!("{word}: {verdict}");
            }
        }
        Commands::Menu => {
            let session = Session::load(&cli.expression, cli.nfa_out, cli.dfa_out)?;
            session.run_menu(io::stdin().lock(), io::stdout())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
