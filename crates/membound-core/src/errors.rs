//! Session error type and its stable codes.

use thiserror::Error;

use crate::alloc::AllocError;
use crate::buffer::BoundedBuf;
use crate::copy::CopyError;

/// Everything a session can stop on.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Input line exceeded capacity; `kept` holds the bytes that fit.
    #[error("input truncated: kept {} of at most {capacity} bytes", .kept.len())]
    Truncated { kept: BoundedBuf, capacity: usize },

    #[error(transparent)]
    Rejected(#[from] CopyError),

    #[error("end of stream: no input available")]
    EndOfStream,

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardErrorKind {
    Truncated,
    Rejected,
    EndOfStream,
    UseAfterRelease,
    Alloc,
    Io,
}

impl GuardError {
    pub fn kind(&self) -> GuardErrorKind {
        match self {
            GuardError::Truncated { .. } => GuardErrorKind::Truncated,
            GuardError::Rejected(_) => GuardErrorKind::Rejected,
            GuardError::EndOfStream => GuardErrorKind::EndOfStream,
            GuardError::Alloc(AllocError::UseAfterRelease) => GuardErrorKind::UseAfterRelease,
            GuardError::Alloc(_) => GuardErrorKind::Alloc,
            GuardError::Io(_) => GuardErrorKind::Io,
        }
    }

    /// Stable machine-readable code, used in JSON output.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            GuardErrorKind::Truncated => "E_TRUNCATED",
            GuardErrorKind::Rejected => "E_REJECTED",
            GuardErrorKind::EndOfStream => "E_END_OF_STREAM",
            GuardErrorKind::UseAfterRelease => "E_USE_AFTER_RELEASE",
            GuardErrorKind::Alloc => "E_ALLOC",
            GuardErrorKind::Io => "E_IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_codes() {
        let e: GuardError = AllocError::UseAfterRelease.into();
        assert_eq!(e.kind(), GuardErrorKind::UseAfterRelease);
        assert_eq!(e.code(), "E_USE_AFTER_RELEASE");

        let e: GuardError = CopyError::Rejected {
            len: 28,
            capacity: 10,
        }
        .into();
        assert_eq!(e.kind(), GuardErrorKind::Rejected);
        assert_eq!(
            e.to_string(),
            "copy rejected: source is 28 bytes, destination holds 10"
        );
    }

    #[test]
    fn truncated_message_reports_kept_length() {
        let mut kept = BoundedBuf::with_capacity(9);
        kept.extend_bounded(b"abcdefghijklmno");
        let e = GuardError::Truncated { kept, capacity: 10 };
        assert_eq!(e.to_string(), "input truncated: kept 9 of at most 10 bytes");
        assert_eq!(e.code(), "E_TRUNCATED");
    }
}
