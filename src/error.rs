//! Error types for the unscan library.

use std::io;
use thiserror::Error;

/// Result type alias for unscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or staging files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF nor a recognized raster image format.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// The input claims a supported format but cannot be decoded.
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// Recognition failed for a single page. Recoverable: the pipeline
    /// degrades the page instead of failing the request.
    #[error("Recognition failed for page {page}: {reason}")]
    PageRecognitionFailed {
        /// Zero-based page index
        page: u32,
        /// Human-readable failure reason
        reason: String,
    },

    /// The OCR or rasterization engine cannot be invoked at all.
    /// Fatal for the whole request; callers may retry after backoff.
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Invalid extraction options.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The request was cancelled before completion.
    #[error("Extraction cancelled")]
    Cancelled,

    /// Error serializing results.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// A short machine-readable classification code, stable across
    /// message wording changes. Exposed to service callers so they can
    /// tell "fix your input" apart from "retry later".
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::CorruptDocument(_) => "corrupt_document",
            Error::PageRecognitionFailed { .. } => "page_recognition_failed",
            Error::EngineUnavailable(_) => "engine_unavailable",
            Error::InvalidOptions(_) => "invalid_options",
            Error::Cancelled => "cancelled",
            Error::Render(_) => "render",
        }
    }

    /// Whether the error is caused by the client's input (non-retryable).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::CorruptDocument(_) | Error::InvalidOptions(_)
        )
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::EngineUnavailable(_))
    }

    /// Whether the error degrades a single page rather than the request.
    pub fn is_page_recoverable(&self) -> bool {
        matches!(self, Error::PageRecognitionFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat("text/html".to_string());
        assert_eq!(err.to_string(), "Unsupported input format: text/html");

        let err = Error::PageRecognitionFailed {
            page: 2,
            reason: "tesseract exited with status 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Recognition failed for page 2: tesseract exited with status 1"
        );
    }

    #[test]
    fn test_classification() {
        assert!(Error::CorruptDocument("truncated".into()).is_client_error());
        assert!(!Error::CorruptDocument("truncated".into()).is_retryable());

        assert!(Error::EngineUnavailable("tesseract not found".into()).is_retryable());
        assert!(!Error::EngineUnavailable("tesseract not found".into()).is_client_error());

        let page_err = Error::PageRecognitionFailed {
            page: 0,
            reason: "timeout".into(),
        };
        assert!(page_err.is_page_recoverable());
        assert!(!page_err.is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.code(), "io");
    }
}
