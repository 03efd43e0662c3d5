/// Errors raised while parsing expected and actual documents.
///
/// Comparison itself never fails: every mismatch is reported as a
/// [`crate::diff::Difference`]. Only parse-time problems surface here.
use std::fmt;

/// The document format an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A JSON document.
    Json,
    /// An HTML document or fragment.
    Html,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Html => f.write_str("HTML"),
        }
    }
}

/// Top-level error type for the comparison engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document (after placeholder substitution) is not valid in its format.
    #[error("failed to parse {format} document: {detail}")]
    DocumentParse {
        /// Which parser rejected the input.
        format: DocumentFormat,
        /// The parser's own message, including line and column where known.
        detail: String,
    },

    /// A `{{...}}` expression could not be turned into a matcher.
    #[error("invalid matcher `{{{{{expression}}}}}`: {source}")]
    Matcher {
        /// The expression text between the braces.
        expression: String,
        /// Why it was rejected.
        #[source]
        source: MatcherError,
    },

    /// A sentinel token was found that has no recorded expression.
    #[error("unknown placeholder `{0}`")]
    UnknownPlaceholder(String),
}

/// Why a placeholder expression was rejected.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// The expression does not name a known matcher.
    #[error("unknown matcher expression `{expression}`")]
    UnknownMatcher {
        /// The offending expression.
        expression: String,
    },

    /// A known matcher keyword with malformed arguments.
    #[error("malformed `{matcher}` arguments in `{expression}`")]
    InvalidSyntax {
        /// The keyword (`regex` or `oneOf`).
        matcher: &'static str,
        /// The offending expression.
        expression: String,
    },

    /// The regex pattern failed to compile.
    #[error("invalid regex pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// The compiler's error.
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_error_shows_braced_expression() {
        let err = Error::Matcher {
            expression: "anyThing".to_owned(),
            source: MatcherError::UnknownMatcher {
                expression: "anyThing".to_owned(),
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("invalid matcher `{{anyThing}}`"), "{msg}");
    }

    #[test]
    fn parse_error_names_format() {
        let err = Error::DocumentParse {
            format: DocumentFormat::Json,
            detail: "EOF while parsing an object at line 1 column 1".to_owned(),
        };
        assert!(err.to_string().starts_with("failed to parse JSON document"));
    }
}
