//! Core library entry for `reqforge`.
//!
//! Two independent pieces live here: an OpenAI chat-completion handler
//! ([`provider`]) behind a swappable transport ([`ports::chat`]), and the
//! versioned create-solution request schemas ([`schema`]).

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod ports;
pub mod provider;
pub mod schema;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// `--help` and `--version` print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["reqforge", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_accepts_help() {
        assert!(run(["reqforge", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_missing_payload_file() {
        let result = run(["reqforge", "validate-id", "/nonexistent/payload.json"]);
        assert!(result.unwrap_err().contains("payload.json"));
    }
}
