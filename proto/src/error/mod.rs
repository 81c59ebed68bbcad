//! Host-level error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host: loading a program, reading configuration,
/// or running the program.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialized AST could not be decoded
    #[error("AST decode error: {message}")]
    Decode { message: String, span: Option<Span> },

    /// Configuration file could not be parsed
    #[error("Config error: {message}")]
    Config { message: String, span: Option<Span> },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::Decode {
            message: message.into(),
            span,
        }
    }

    pub fn config(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::Config {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Decode { span, .. } | Self::Config { span, .. } => *span,
            Self::Io { .. } | Self::Runtime(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Io { message } => message,
            Self::Decode { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Runtime(err) => &err.message,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// Report error with ariadne, pointing into `source` when the error is located
pub fn report_error(filename: &str, source: &str, error: &Error) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        Error::Io { .. } => "IO",
        Error::Decode { .. } => "Decode",
        Error::Config { .. } => "Config",
        Error::Runtime(_) => "Runtime",
    };

    let report = if let Some(span) = error.span() {
        Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
    };

    if report.eprint((filename, Source::from(source))).is_err() {
        eprintln!("{error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = Error::io_error("file not found");
        assert_eq!(err.to_string(), "IO error: file not found");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_decode_error_keeps_span() {
        let err = Error::decode("expected value", Some(Span::new(4, 4)));
        assert_eq!(err.span(), Some(Span::new(4, 4)));
        assert_eq!(err.message(), "expected value");
        assert!(err.to_string().starts_with("AST decode error:"));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("unknown field `depth`", None);
        assert_eq!(err.to_string(), "Config error: unknown field `depth`");
    }

    #[test]
    fn test_runtime_error_is_transparent() {
        let err: Error = RuntimeError::undefined_variable("x", None).into();
        assert_eq!(err.to_string(), "Runtime error: variable not found: x");
        assert_eq!(err.message(), "variable not found: x");
    }

    #[test]
    fn test_from_std_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.message().contains("missing"));
    }
}
