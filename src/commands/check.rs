//! `reqforge check` command.

use std::io::Write;

use super::write_err;
use crate::config::ConfigOptions;
use crate::context::ServiceContext;
use crate::provider::ModelHandler;

/// Checks the provider credentials and prints `valid` or `invalid`.
///
/// # Errors
///
/// Returns an error string if the options are invalid or the check fails;
/// the latter still prints `invalid` first.
pub async fn run(
    ctx: &ServiceContext,
    options: &ConfigOptions,
    out: &mut dyn Write,
) -> Result<(), String> {
    let handler = ctx.openai_handler(options).map_err(|e| e.to_string())?;
    let model = handler.get_model().id;
    if handler.is_valid().await {
        writeln!(out, "valid ({model})").map_err(|e| write_err(&e))
    } else {
        writeln!(out, "invalid ({model})").map_err(|e| write_err(&e))?;
        Err(format!("credentials or model {model} were rejected"))
    }
}
