//! Implementation of `docmatch json <expected> <actual>`.
//!
//! - Expected file missing: created from the actual document with `--update`,
//!   otherwise an error.
//! - Without `--update`: compared, with the report on stdout on mismatch.
//! - With `--update`: rewritten when the documents differ, carrying matchers
//!   over at positions that still exist.
//!
//! Exit codes: 0 = match or updated, 1 = mismatch, 2 = input failure.
use docmatch_core::{
    DocumentFormat, JSON_ROOT_PATH, JsonConfig, check_json, compare_json, initial_expected_json,
    parse_actual_json, parse_expected_json, sort_differences, updated_expected_json,
};

use super::RunContext;
use crate::cli::Documents;
use crate::error::{CliError, parse_failed};
use crate::io::{read_expected, read_input, write_expected};

/// Runs the `json` subcommand.
///
/// # Errors
///
/// [`CliError::Mismatch`] when the documents differ outside update mode, and
/// input failures (exit code 2) for unreadable, unparsable, or unwritable
/// files.
pub fn run(ctx: &RunContext, documents: &Documents, config: &JsonConfig) -> Result<(), CliError> {
    let expected_path = documents.expected.as_path();
    let actual_text = read_input(&documents.actual, ctx.max_file_size)?;
    let expected_text = read_expected(expected_path, ctx.max_file_size)?;

    let Some(expected_text) = expected_text else {
        if !ctx.update {
            return Err(CliError::ExpectedMissing {
                path: documents.expected.clone(),
            });
        }
        let actual = parse_actual_json(actual_text.as_bytes())
            .map_err(parse_failed(&documents.actual))?;
        write_expected(expected_path, &initial_expected_json(&actual))?;
        ctx.created(expected_path);
        return Ok(());
    };

    if !ctx.update {
        let report = check_json(&expected_text, actual_text.as_bytes(), config, &ctx.palette)
            .map_err(parse_failed(format!(
                "{} against {}",
                documents.actual,
                expected_path.display()
            )))?;
        return ctx.finish(&report);
    }

    let expected = parse_expected_json(&expected_text)
        .map_err(parse_failed(expected_path.display()))?;
    let actual =
        parse_actual_json(actual_text.as_bytes()).map_err(parse_failed(&documents.actual))?;
    let mut differences = compare_json(&expected.root, &actual, JSON_ROOT_PATH, config);
    if differences.is_empty() {
        return Ok(());
    }
    sort_differences(&mut differences);
    write_expected(expected_path, &updated_expected_json(&expected, &actual))?;
    ctx.updated(expected_path, &differences, DocumentFormat::Json);
    Ok(())
}
