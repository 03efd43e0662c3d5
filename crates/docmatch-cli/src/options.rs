/// Comparison options: an optional JSON options file with CLI flags on top.
///
/// The options file has one section per format, each deserializing into the
/// core config type:
///
/// ```json
/// {
///   "json": { "ignored_fields": ["updated_at"], "ignore_array_order": true },
///   "html": { "ignore_comments": true, "ignored_elements": ["script"] }
/// }
/// ```
use std::path::Path;

use docmatch_core::{HtmlConfig, JsonConfig};
use serde::Deserialize;

use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::read_input;

/// Both format configs, as loaded from an options file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Options for `docmatch json`.
    pub json: JsonConfig,
    /// Options for `docmatch html`.
    pub html: HtmlConfig,
}

impl Options {
    /// Loads the options file, or returns the defaults when none is given.
    ///
    /// # Errors
    ///
    /// Read failures as for any input, and [`CliError::ParseFailed`] for a
    /// file that is not a valid options document.
    pub fn load(path: Option<&Path>, max_size: u64) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = read_input(&PathOrStdin::Path(path.to_path_buf()), max_size)?;
        let options = Self::parse(&text).map_err(|e| CliError::ParseFailed {
            detail: format!("options file {}: {e}", path.display()),
        })?;
        tracing::debug!(path = %path.display(), "loaded options file");
        Ok(options)
    }

    fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// JSON flags given on the command line.
#[derive(Debug, Default)]
pub struct JsonFlags {
    pub ignore_fields: Vec<String>,
    pub ignore_array_order: bool,
    pub ignore_array_order_at: Vec<String>,
}

impl JsonFlags {
    /// Applies the flags on top of `base`: booleans are OR-ed in, lists are
    /// appended.
    pub fn apply(self, base: JsonConfig) -> JsonConfig {
        let mut config = base.ignore_fields(self.ignore_fields);
        if self.ignore_array_order {
            config = config.ignore_array_order();
        }
        for path in self.ignore_array_order_at {
            config = config.ignore_array_order_at(path);
        }
        config
    }
}

/// HTML flags given on the command line.
#[derive(Debug, Default)]
pub struct HtmlFlags {
    pub ignore_comments: bool,
    pub preserve_whitespace: bool,
    pub ignore_child_order: bool,
    pub ignore_child_order_at: Vec<String>,
    pub ignore_elements: Vec<String>,
    pub ignore_attributes: Vec<String>,
    pub ignore_attribute_at: Vec<String>,
}

impl HtmlFlags {
    /// Applies the flags on top of `base`, as [`JsonFlags::apply`] does.
    pub fn apply(self, base: HtmlConfig) -> HtmlConfig {
        let mut config = base
            .ignore_elements(self.ignore_elements)
            .ignore_attributes(self.ignore_attributes);
        if self.ignore_comments {
            config = config.ignore_comments();
        }
        if self.preserve_whitespace {
            config = config.preserve_whitespace();
        }
        if self.ignore_child_order {
            config = config.ignore_child_order();
        }
        for path in self.ignore_child_order_at {
            config = config.ignore_child_order_at(path);
        }
        for path_attr in self.ignore_attribute_at {
            config = config.ignore_attribute_at(path_attr);
        }
        config
    }
}
