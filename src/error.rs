//! Error Types
//!
//! Every failure a stream can report. Errors travel on the same channel as
//! records, so a caller sees them in document order.

use std::io;

use thiserror::Error;

/// Failure surfaced while turning a document into records
#[derive(Debug, Error)]
pub enum Error {
    /// Markup the tokenizer could not accept
    #[error("malformed markup at byte {offset}: {message}")]
    Malformed { offset: u64, message: String },

    /// A tag name, attribute or text run was not valid UTF-8
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: u64 },

    /// Input ended while a record was still open
    #[error("input ended inside <{boundary}> before it was closed")]
    Truncated { boundary: &'static str },

    /// Input ended with elements still open outside any record
    #[error("input ended with <{name}> still open")]
    Unclosed { name: String },

    /// Input ended before the root element was seen
    #[error("input ended before the root element {marker} was found")]
    MissingRoot { marker: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a markup error at the given stream offset
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Error::Malformed {
            offset,
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::malformed(12, "unexpected close tag </b>");
        assert_eq!(
            err.to_string(),
            "malformed markup at byte 12: unexpected close tag </b>"
        );

        let err = Error::Truncated { boundary: "character" };
        assert_eq!(
            err.to_string(),
            "input ended inside <character> before it was closed"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
