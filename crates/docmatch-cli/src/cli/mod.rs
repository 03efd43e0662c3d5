//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for PathOrStdin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathOrStdin::Stdin => f.write_str("-"),
            PathOrStdin::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The two positional documents every subcommand takes.
#[derive(Args, Debug)]
pub struct Documents {
    /// Expected (template) file. Created or rewritten in update mode.
    #[arg(value_name = "EXPECTED")]
    pub expected: PathBuf,
    /// Actual document, or `-` for stdin.
    #[arg(value_name = "ACTUAL")]
    pub actual: PathOrStdin,
}

/// All top-level subcommands exposed by the `docmatch` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare an actual JSON document against an expected template.
    Json {
        #[command(flatten)]
        documents: Documents,
        /// Skip a field by name (any depth) or by full path such as `$.meta.id`.
        #[arg(long = "ignore-field", value_name = "NAME|PATH")]
        ignore_fields: Vec<String>,
        /// Compare every array without regard to element order.
        #[arg(long)]
        ignore_array_order: bool,
        /// Compare arrays at and below PATH without regard to order.
        #[arg(long, value_name = "PATH")]
        ignore_array_order_at: Vec<String>,
    },

    /// Compare an actual HTML document against an expected template.
    Html {
        #[command(flatten)]
        documents: Documents,
        /// Drop comment nodes before comparing.
        #[arg(long)]
        ignore_comments: bool,
        /// Compare text exactly instead of collapsing whitespace.
        #[arg(long)]
        preserve_whitespace: bool,
        /// Compare all children without regard to order.
        #[arg(long)]
        ignore_child_order: bool,
        /// Compare children at and below the element PATH without regard to order.
        #[arg(long, value_name = "PATH")]
        ignore_child_order_at: Vec<String>,
        /// Skip every element with this tag name.
        #[arg(long = "ignore-element", value_name = "TAG")]
        ignore_elements: Vec<String>,
        /// Skip this attribute on every element.
        #[arg(long = "ignore-attribute", value_name = "NAME")]
        ignore_attributes: Vec<String>,
        /// Skip one attribute on one element, e.g. `html > body > div@class`.
        #[arg(long, value_name = "PATH@ATTR")]
        ignore_attribute_at: Vec<String>,
    },
}

/// Root CLI struct for the `docmatch` binary.
#[derive(Parser, Debug)]
#[command(
    name = "docmatch",
    version,
    about = "Compare JSON and HTML documents against expected templates with {{...}} matchers"
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Create or rewrite the expected file from the actual document instead
    /// of failing.
    ///
    /// Can also be enabled with `DOCMATCH_UPDATE=true` or `DOCMATCH_UPDATE=1`.
    #[arg(
        long,
        global = true,
        env = "DOCMATCH_UPDATE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub update: bool,

    /// JSON options file with `json` and `html` sections. Flags are applied
    /// on top of it.
    #[arg(long, global = true, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Print only the inline diff on mismatch, and nothing after an update
    /// (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit debug logs to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `DOCMATCH_MAX_FILE_SIZE` environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "DOCMATCH_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in the diff output.
    ///
    /// The `NO_COLOR` environment variable is also respected, per
    /// <https://no-color.org>.
    #[arg(long, global = true)]
    pub no_color: bool,
}
