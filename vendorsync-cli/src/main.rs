//! vendorsync — keep a vendored dependency and `Godeps/Godeps.json` in step.
//!
//! # Usage
//!
//! ```text
//! vendorsync update <import-path> [--dry-run] [--keep-comment]
//! ```
//!
//! Run from the project root. Exit status: 0 on success (updated or already
//! up to date), 1 on any failure (`Error: ...` on stdout), 2 on usage errors.
//! Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::update::UpdateArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "vendorsync",
    version,
    about = "Re-vendor a dependency into Godeps/_workspace and pin it in Godeps.json",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the latest upstream source of a dependency and vendor it.
    Update(UpdateArgs),
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // Usage errors exit with status 2 inside `parse`.
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Update(args) => args.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
