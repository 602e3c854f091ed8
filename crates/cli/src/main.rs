//! tagnotes command line.
//!
//! Compiles the release body for a tag from the repository's closed issues
//! and merged pull requests, then creates or updates the GitHub release.

// The binary reports to stdout/stderr directly
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod tracing;

use crate::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    if let Err(error) = run().await {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

async fn run() -> miette::Result<()> {
    // Usage errors exit with status 2 from inside clap.
    let cli = Cli::parse();

    crate::tracing::init_tracing(cli.tracing_config())?;

    let config = cli.release_config()?;
    let outcome = commands::release::execute_release(&config, &cli.host_config()).await?;

    let output = commands::release::render_outcome(&outcome);
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }

    Ok(())
}
