//! `reqforge model` command.

use std::io::Write;

use super::write_err;
use crate::config::ConfigOptions;
use crate::context::ServiceContext;
use crate::provider::ModelHandler;

/// Prints the model id requests will use.
///
/// # Errors
///
/// Returns an error string if the options are invalid.
pub fn run(
    ctx: &ServiceContext,
    options: &ConfigOptions,
    out: &mut dyn Write,
) -> Result<(), String> {
    let handler = ctx.openai_handler(options).map_err(|e| e.to_string())?;
    writeln!(out, "{}", handler.get_model().id).map_err(|e| write_err(&e))
}
