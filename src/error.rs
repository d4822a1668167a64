//! The error type returned by the encoders, the decoders and the public API.

use thiserror::Error;

/// The category of an error. Callers use this to decide whether the problem
/// is on their side, in the data, or in the environment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    CorruptStream,
    OutOfMemory,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    /// The call-site input is malformed (for example, a buffer too short to
    /// hold a header).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The compressed data is structurally present but invalid.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// An allocation failed, or the declared size is above the ceiling.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// The bit reader ran past the end of its buffer.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// Propagated I/O error (file helpers only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Return the category of the error. A truncated bitstream is a property
    /// of the data, so it is reported as corruption.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::CorruptStream(_) | Error::UnexpectedEndOfStream => {
                ErrorKind::CorruptStream
            }
            Error::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for building a `CorruptStream` error.
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptStream(msg.into())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = Error::InvalidArgument("short".into());
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::corrupt("x").kind(), ErrorKind::CorruptStream);
        assert_eq!(
            Error::UnexpectedEndOfStream.kind(),
            ErrorKind::CorruptStream
        );

        let mut v: Vec<u8> = Vec::new();
        let err: Error = v.try_reserve(usize::MAX).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::OutOfMemory);
        assert!(err.to_string().starts_with("out of memory"));
    }
}
