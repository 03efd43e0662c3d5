/// Command module for the `docmatch` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the run context, the documents and the merged config, and
/// returns `Ok(())` on a match or a completed update, or a
/// [`crate::error::CliError`] otherwise.
use std::io::Write as _;
use std::path::Path;

use docmatch_core::{CheckReport, Difference, DocumentFormat, Palette, format_differences};

use crate::error::CliError;

pub mod html;
pub mod json;

/// Flag-derived settings shared by every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    /// Create or rewrite the expected file instead of failing.
    pub update: bool,
    /// Suppress the per-path listing and update notices.
    pub quiet: bool,
    /// Colors for the inline diff.
    pub palette: Palette,
    /// Input size limit in bytes.
    pub max_file_size: u64,
}

impl RunContext {
    /// Prints the mismatch report to stdout and returns
    /// [`CliError::Mismatch`]. Matches return `Ok(())`.
    pub fn finish(&self, report: &CheckReport) -> Result<(), CliError> {
        if report.is_match() {
            return Ok(());
        }
        let mut text = String::new();
        if let Some(inline) = &report.inline_diff {
            text.push_str(inline);
        }
        if !self.quiet {
            text.push('\n');
            text.push_str(&report.summary);
        }
        write_stdout(&text)?;
        Err(CliError::Mismatch {
            differences: report.differences.len(),
        })
    }

    /// Notes a freshly created expected file on stderr.
    pub fn created(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "created expected file");
        if !self.quiet {
            eprintln!("created {}", path.display());
        }
    }

    /// Notes a rewritten expected file, with what changed, on stderr.
    pub fn updated(&self, path: &Path, differences: &[Difference], format: DocumentFormat) {
        tracing::debug!(
            path = %path.display(),
            differences = differences.len(),
            "updated expected file"
        );
        if !self.quiet {
            eprintln!(
                "updated {}\n\n{}",
                path.display(),
                format_differences(differences, format)
            );
        }
    }
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| CliError::IoError {
            source: "stdout".to_owned(),
            detail: e.to_string(),
        })
}
