mod cli;
mod cmd;
mod error;
mod format;
mod io;
mod logging;
mod options;

use clap::Parser;

pub use cli::{Cli, Command, PathOrStdin};

use crate::cmd::RunContext;
use crate::error::CliError;
use crate::options::{HtmlFlags, JsonFlags, Options};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        // A mismatch has already printed its report to stdout.
        if !matches!(e, CliError::Mismatch { .. }) {
            eprintln!("{}", e.message());
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = Options::load(cli.options.as_deref(), cli.max_file_size)?;
    let ctx = RunContext {
        update: cli.update,
        quiet: cli.quiet,
        palette: format::palette(cli.no_color),
        max_file_size: cli.max_file_size,
    };

    match cli.command {
        Command::Json {
            documents,
            ignore_fields,
            ignore_array_order,
            ignore_array_order_at,
        } => {
            let config = JsonFlags {
                ignore_fields,
                ignore_array_order,
                ignore_array_order_at,
            }
            .apply(options.json);
            cmd::json::run(&ctx, &documents, &config)
        }
        Command::Html {
            documents,
            ignore_comments,
            preserve_whitespace,
            ignore_child_order,
            ignore_child_order_at,
            ignore_elements,
            ignore_attributes,
            ignore_attribute_at,
        } => {
            let config = HtmlFlags {
                ignore_comments,
                preserve_whitespace,
                ignore_child_order,
                ignore_child_order_at,
                ignore_elements,
                ignore_attributes,
                ignore_attribute_at,
            }
            .apply(options.html);
            cmd::html::run(&ctx, &documents, &config)
        }
    }
}
