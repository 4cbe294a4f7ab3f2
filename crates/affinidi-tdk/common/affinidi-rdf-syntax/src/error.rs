use std::fmt;

/// Errors that can occur while reading or writing RDF text.
#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    /// The caller handed over something that is not text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A grammar violation. `line` and `column` are 1-based.
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("Adapter error: {0}")]
    AdapterError(String),
}

/// Result type alias for RDF operations.
pub type Result<T> = std::result::Result<T, RdfError>;

impl RdfError {
    pub fn parse(line: usize, column: usize, msg: impl fmt::Display) -> Self {
        Self::ParseError {
            line,
            column,
            message: msg.to_string(),
        }
    }

    pub fn invalid_input(msg: impl fmt::Display) -> Self {
        Self::InvalidInput(msg.to_string())
    }

    pub fn context(msg: impl fmt::Display) -> Self {
        Self::ContextError(msg.to_string())
    }

    pub fn adapter(msg: impl fmt::Display) -> Self {
        Self::AdapterError(msg.to_string())
    }

    /// The `(line, column)` of a parse error, if this is one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::ParseError { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}
