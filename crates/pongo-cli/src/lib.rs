//! # Pongo CLI
//!
//! Command-line front end for [`pongo_core`]: decode versioned schema
//! documents, process data files with them in either direction, and export
//! JSON Schema.
//!
//! ## Modules
//!
//! - `cli`: command definitions, execution and output rendering
//! - `config`: optional TOML settings file
//! - `error`: error classification for user-facing reporting

pub mod cli;
pub mod config;
pub mod error;

pub use cli::{ExitCode, OutputFormat, PongoCli, PongoCommands};
pub use config::CliConfig;
pub use error::CliError;

/// Run the CLI and return the exit code
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use pongo_cli::{run_cli, PongoCli};
///
/// fn main() {
///     let cli = PongoCli::parse();
///     let exit_code = run_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_cli(cli: PongoCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(&e)
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is WARN, raised one step
/// per `-v` and lowered to ERROR by `--quiet`.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
