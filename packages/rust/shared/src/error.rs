//! Error types for the blog outline builder.
//!
//! Library crates use [`BlogOutlineError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::Credential;

/// Top-level error type for all blog outline operations.
#[derive(Debug, thiserror::Error)]
pub enum BlogOutlineError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure talking to a hosted API.
    #[error("network error: {0}")]
    Network(String),

    /// A hosted API answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Agent runtime error (tool dispatch, empty answer, runaway tool loop).
    #[error("agent error: {0}")]
    Agent(String),

    /// Response or input parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Generation was requested while one or both API keys are absent.
    #[error("{}", missing_message(.0))]
    MissingCredentials(Vec<Credential>),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlogOutlineError>;

fn missing_message(missing: &[Credential]) -> String {
    missing
        .iter()
        .map(|c| c.missing_message())
        .collect::<Vec<_>>()
        .join("\n")
}

impl BlogOutlineError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The user-facing lines to show for this error, one per line of output.
    ///
    /// Missing credentials expand to one message each; everything else is a
    /// single line with the raw error text.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::MissingCredentials(missing) => missing
                .iter()
                .map(|c| c.missing_message().to_string())
                .collect(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BlogOutlineError::config("missing base url");
        assert_eq!(err.to_string(), "config error: missing base url");

        let err = BlogOutlineError::Api {
            service: "OpenAI",
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "OpenAI returned HTTP 429: rate limited");
    }

    #[test]
    fn missing_credentials_lists_each_message() {
        let err = BlogOutlineError::MissingCredentials(vec![
            Credential::OpenAi,
            Credential::SerpApi,
        ]);
        let lines = err.user_messages();
        assert_eq!(
            lines,
            vec![
                "Please provide your OpenAI API key.".to_string(),
                "Please provide your SerpAPI key.".to_string(),
            ]
        );
        assert_eq!(err.to_string(), lines.join("\n"));
    }

    #[test]
    fn other_errors_are_single_line() {
        let err = BlogOutlineError::Network("connection reset".into());
        assert_eq!(err.user_messages(), vec!["network error: connection reset"]);
    }
}
