#![forbid(unsafe_code)]

//! # theme-check CLI
//!
//! ```bash
//! theme-check validate themes/dark.json
//! theme-check contrast Dark=themes/dark.json Light=themes/light.json
//! ```

use std::process::ExitCode;

use theme_check::cli::{self, Cli, EXIT_USAGE};
use theme_check::logging;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose, cli.log_format);

    match cli::run(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "Run failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}
