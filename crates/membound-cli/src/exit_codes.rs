//! Unified exit codes for membound.
//! These codes are part of the public contract; scripts rely on them.

use membound_core::{GuardError, GuardErrorKind};

pub const SUCCESS: i32 = 0;
pub const BOUND_EXCEEDED: i32 = 1; // Truncated, Rejected or EndOfStream
pub const FINDINGS: i32 = 1; // Scan reported at least one finding
pub const CONFIG_ERROR: i32 = 2; // Bad config, bad arguments, unreadable input
pub const USE_AFTER_RELEASE: i32 = 3; // Released handle was touched

pub fn for_error(err: &GuardError) -> i32 {
    match err.kind() {
        GuardErrorKind::Truncated | GuardErrorKind::Rejected | GuardErrorKind::EndOfStream => {
            BOUND_EXCEEDED
        }
        GuardErrorKind::UseAfterRelease => USE_AFTER_RELEASE,
        GuardErrorKind::Alloc | GuardErrorKind::Io => CONFIG_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use membound_core::{AllocError, CopyError};

    #[test]
    fn bounded_failures_share_one_code() {
        let rejected: GuardError = CopyError::Rejected {
            len: 28,
            capacity: 10,
        }
        .into();
        assert_eq!(for_error(&rejected), BOUND_EXCEEDED);
        assert_eq!(for_error(&GuardError::EndOfStream), BOUND_EXCEEDED);
    }

    #[test]
    fn use_after_release_is_distinct() {
        let err: GuardError = AllocError::UseAfterRelease.into();
        assert_eq!(for_error(&err), USE_AFTER_RELEASE);
        assert_ne!(USE_AFTER_RELEASE, BOUND_EXCEEDED);
        assert_ne!(USE_AFTER_RELEASE, CONFIG_ERROR);
    }
}
