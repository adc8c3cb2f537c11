//! `reqforge validate-solution` and `reqforge validate-id` commands.

use std::io::{Read, Write};
use std::path::Path;

use serde_json::Value;

use super::write_err;
use crate::schema::{self, SchemaError, SchemaVersion};

/// Validates a create-solution payload and prints the outcome.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or the payload is rejected.
pub fn run_solution(
    path: &Path,
    version: SchemaVersion,
    out: &mut dyn Write,
) -> Result<(), String> {
    let payload = read_payload(path)?;
    match schema::validate_solution(version, &payload) {
        Ok(solution) => writeln!(out, "OK: solution {:?} is valid ({version})", solution.name())
            .map_err(|e| write_err(&e)),
        Err(e) => report(&e, out),
    }
}

/// Validates an identifier payload and prints the outcome.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or the payload is rejected.
pub fn run_id(path: &Path, out: &mut dyn Write) -> Result<(), String> {
    let payload = read_payload(path)?;
    match schema::validate_solution_id(&payload) {
        Ok(reference) => writeln!(out, "OK: id {:?}", reference.id.unwrap_or_default())
            .map_err(|e| write_err(&e)),
        Err(e) => report(&e, out),
    }
}

/// Prints each field violation on its own line and fails.
fn report(error: &SchemaError, out: &mut dyn Write) -> Result<(), String> {
    if let Some(fields) = error.field_errors() {
        for field in fields.errors() {
            writeln!(out, "  {}: {}", field.path, field.code).map_err(|e| write_err(&e))?;
        }
    }
    Err(error.to_string())
}

fn read_payload(path: &Path) -> Result<Value, String> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read payload from stdin: {e}"))?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read payload {}: {e}", path.display()))?
    };
    serde_json::from_str(&content)
        .map_err(|e| format!("Payload {} is not JSON: {e}", path.display()))
}
