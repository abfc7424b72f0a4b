use serde::Serialize;

/// Result type for codemod operations
pub type CodemodResult<T> = Result<T, CodemodError>;

/// Line/column of a parse failure (1-based line, 0-based column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// Errors that abort a whole file transform.
#[derive(Debug, thiserror::Error)]
pub enum CodemodError {
    /// The input could not be parsed under the requested dialect
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        location: Option<SourceLocation>,
    },

    /// A rule whose strategy cannot run against what it matches
    #[error("Invalid rule `{rule}`: {message}")]
    InvalidRule { rule: String, message: String },

    /// Options or rule catalog JSON did not deserialize
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The emitter failed to write the module
    #[error("Failed to print module: {0}")]
    Print(#[from] std::io::Error),

    /// Raised instead of skipping when the transform runs in strict mode
    #[error("Malformed match: {0}")]
    Malformed(MalformedMatch),
}

impl CodemodError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            location: None,
        }
    }

    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: Some(SourceLocation { line, column }),
        }
    }

    pub fn invalid_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// An occurrence whose expected child was missing or had an unexpected
/// shape. The occurrence is left exactly as it was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{rule} at {location}: {reason}")]
pub struct MalformedMatch {
    pub rule: String,
    /// `file:start-end` line range of the matched node
    pub location: String,
    pub reason: String,
}
