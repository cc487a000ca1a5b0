//! Error types for unipynb library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unipynb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for unipynb library.
#[derive(Error, Debug)]
pub enum Error {
    /// The input notebook does not exist.
    #[error("Notebook file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The notebook content is not valid JSON or has the wrong shape.
    #[error("Invalid JSON in notebook file: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Options that cannot be used together.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// An embedded image payload could not be decoded or saved.
    ///
    /// Recovered inside the renderer; never returned from a conversion.
    #[error("Image decode error: {0}")]
    ImageDecode(String),
}

impl Error {
    /// Returns true if the error aborts the conversion of the current document.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::ImageDecode(_))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_keeps_parser_diagnostic() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{\"cells\": [")
            .unwrap_err()
            .into();
        let message = err.to_string();
        assert!(message.starts_with("Invalid JSON in notebook file:"));
        assert!(message.contains("line 1"), "diagnostic missing: {}", message);
    }

    #[test]
    fn test_fatality() {
        assert!(Error::NotFound(PathBuf::from("a.ipynb")).is_fatal());
        assert!(Error::Io(io::Error::other("disk full")).is_fatal());
        assert!(!Error::ImageDecode("bad padding".into()).is_fatal());
    }
}
