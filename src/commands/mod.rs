//! Command dispatch and handlers.

pub mod check;
pub mod invoke;
pub mod model;
pub mod validate;

use std::io::Write;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler, writing results to stdout.
///
/// `REQFORGE_RECORD` / `REQFORGE_REPLAY` select how chat exchanges are
/// served; see [`ServiceContext::from_env`].
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let ctx = ServiceContext::from_env()?;
    let mut stdout = std::io::stdout().lock();
    dispatch_with_context(cli, &ctx, &mut stdout)
}

/// Dispatch a command with the given context and output sink.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    cli: &Cli,
    ctx: &ServiceContext,
    out: &mut dyn Write,
) -> Result<(), String> {
    let options = cli.provider.to_options();
    match &cli.command {
        Command::Model => model::run(ctx, &options, out),
        Command::Invoke { system, prompt } => {
            block_on(invoke::run(ctx, &options, system.as_deref(), prompt, out))?
        }
        Command::Check => block_on(check::run(ctx, &options, out))?,
        Command::ValidateSolution { file, schema } => {
            validate::run_solution(file, (*schema).into(), out)
        }
        Command::ValidateId { file } => validate::run_id(file, out),
    }
}

/// Runs `future` on a fresh current-thread runtime.
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

/// Maps an output write failure into the command error type.
pub(crate) fn write_err(e: &std::io::Error) -> String {
    format!("failed to write output: {e}")
}
