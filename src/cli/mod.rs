mod commands;
mod error;
pub mod exit_codes;
pub mod output;

pub use commands::{init_logging, Cli, Commands, ConfigCommands, LogLevel};
pub use error::CliError;

use output::OutputMode;

/// run the parsed command line, reporting any error, and return the exit code
pub fn run(cli: Cli) -> i32 {
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match commands::execute(cli, output_mode) {
        Ok(code) => code,
        Err(err) => {
            log::debug!("command failed with code {}: {}", err.code, err.message);
            output::print_error(output_mode, &err);
            err.code
        }
    }
}
