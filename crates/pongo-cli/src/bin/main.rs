//! Pongo CLI
//!
//! # Usage
//!
//! ```bash
//! # Parse a data file with a schema document
//! pongo validate --schema user.schema.json --data user.yaml
//!
//! # Serialize instead, printing JSON
//! pongo validate --schema user.schema.json --data user.json --action serialize --format json
//!
//! # Summarize a schema document
//! pongo check --schema user.schema.json
//!
//! # Export as JSON Schema
//! pongo export --schema user.schema.json --action parse
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: The schema rejected the data
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Schema document errors
//! - 10: Internal error

use clap::Parser;
use pongo_cli::{init_tracing, run_cli, PongoCli};

fn main() {
    // Parse CLI arguments
    let cli = PongoCli::parse();

    // Initialize tracing subscriber for logging
    init_tracing(cli.verbose, cli.quiet);

    // Run the CLI and exit with appropriate code
    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
