//! Implementation of `docmatch html <expected> <actual>`.
//!
//! Same flow as `docmatch json`. In update mode the expected file is replaced
//! by the indented rendering of the actual document; matchers in the old file
//! are not carried over.
//!
//! Exit codes: 0 = match or updated, 1 = mismatch, 2 = input failure.
use docmatch_core::{
    DocumentFormat, HtmlConfig, check_html, compare_html, parse_actual_html, parse_expected_html,
    render_expected_html, sort_differences,
};

use super::RunContext;
use crate::cli::Documents;
use crate::error::{CliError, parse_failed};
use crate::io::{read_expected, read_input, write_expected};

/// Runs the `html` subcommand.
///
/// # Errors
///
/// As for [`super::json::run`].
pub fn run(ctx: &RunContext, documents: &Documents, config: &HtmlConfig) -> Result<(), CliError> {
    let expected_path = documents.expected.as_path();
    let actual_text = read_input(&documents.actual, ctx.max_file_size)?;

    let Some(expected_text) = read_expected(expected_path, ctx.max_file_size)? else {
        if !ctx.update {
            return Err(CliError::ExpectedMissing {
                path: documents.expected.clone(),
            });
        }
        let actual = parse_actual_html(&actual_text);
        write_expected(expected_path, &render_expected_html(&actual))?;
        ctx.created(expected_path);
        return Ok(());
    };

    if !ctx.update {
        let report = check_html(&expected_text, actual_text.as_bytes(), config, &ctx.palette)
            .map_err(parse_failed(expected_path.display()))?;
        return ctx.finish(&report);
    }

    let expected =
        parse_expected_html(&expected_text).map_err(parse_failed(expected_path.display()))?;
    let actual = parse_actual_html(&actual_text);
    let mut differences = compare_html(&expected.root, &actual, config);
    if differences.is_empty() {
        return Ok(());
    }
    sort_differences(&mut differences);
    write_expected(expected_path, &render_expected_html(&actual))?;
    ctx.updated(expected_path, &differences, DocumentFormat::Html);
    Ok(())
}
