/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `docmatch` binary. Every
/// variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. An input could not be read, parsed, or
///   written back, so no verdict was reached.
/// - Exit code **1**: the documents were compared and differ.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `docmatch` CLI can produce.
///
/// [`CliError::message`] returns the human-readable string printed to stderr
/// before exiting.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The expected file does not exist and update mode is off.
    ExpectedMissing {
        /// The expected file's path.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// `"stdout"`, `"-"`, or the filesystem path.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The expected file could not be written in update mode.
    WriteFailed {
        /// The path being written.
        path: PathBuf,
        /// The underlying I/O error message.
        detail: String,
    },

    /// A document, matcher expression, or options file was rejected.
    ParseFailed {
        /// Which input failed and why.
        detail: String,
    },

    // --- Exit code 1: mismatch ---
    /// The documents differ. The report has already been printed.
    Mismatch {
        /// Number of differences found.
        differences: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::ExpectedMissing { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::WriteFailed { .. }
            | Self::ParseFailed { .. } => 2,

            Self::Mismatch { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::ExpectedMissing { path } => format!(
                "error: expected file does not exist: {} (run with --update to create it)",
                path.display()
            ),
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::WriteFailed { path, detail } => {
                format!("error: failed to write {}: {detail}", path.display())
            }
            Self::ParseFailed { detail } => format!("error: {detail}"),
            Self::Mismatch { differences: 1 } => "documents differ at 1 path".to_owned(),
            Self::Mismatch { differences } => format!("documents differ at {differences} paths"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

/// Wraps a core parse error with the input it came from.
pub fn parse_failed(context: impl fmt::Display) -> impl Fn(docmatch_core::Error) -> CliError {
    move |e| CliError::ParseFailed {
        detail: format!("{context}: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
