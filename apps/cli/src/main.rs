//! PolicyScan CLI: flag sensitive data practices in a privacy policy.
//!
//! Reads a policy from a file or an interactive paste, reports the sentences
//! that touch on sharing, selling, tracking and similar practices, and
//! suggests actions to protect your data.

mod commands;
mod input;
mod report;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
