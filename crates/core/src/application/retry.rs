// Member upload retry
use crate::application::constants::{MEMBER_UPLOAD_MAX_ATTEMPTS, MEMBER_UPLOAD_RETRY_BASE_DELAY};
use crate::error::ZosmfError;
use std::time::Duration;
use tracing::warn;

/// Error text fragments (lowercase) that mark a PDS upload failure as transient
const TRANSIENT_FRAGMENTS: [&str; 6] = [
    "isrz002",
    "i/o error",
    "lmfind error",
    "directory",
    "timeout",
    "connection",
];

/// Whether a failed member upload is worth another attempt.
///
/// z/OSMF reports PDS directory contention (ISRZ002, LMFIND) only in the
/// message text, so this is a substring test on the rendered error.
pub fn is_transient_directory_fault(error: &ZosmfError) -> bool {
    if matches!(error, ZosmfError::Domain(_)) {
        return false;
    }
    let text = error.to_string().to_lowercase();
    TRANSIENT_FRAGMENTS
        .iter()
        .any(|fragment| text.contains(fragment))
}

/// Retry decision result
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after the delay
    Retry(Duration),
    /// Give up and surface the error
    Failed,
    /// Attempts used up on a transient error
    Exhausted,
}

/// Linear backoff policy for member uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberUploadRetry {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for MemberUploadRetry {
    fn default() -> Self {
        Self {
            max_attempts: MEMBER_UPLOAD_MAX_ATTEMPTS,
            base_delay: MEMBER_UPLOAD_RETRY_BASE_DELAY,
        }
    }
}

impl MemberUploadRetry {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Decide what to do after `attempt` (1-based) failed with `error`
    pub fn should_retry(&self, attempt: u32, error: &ZosmfError) -> RetryDecision {
        if !is_transient_directory_fault(error) {
            return RetryDecision::Failed;
        }
        if attempt >= self.max_attempts {
            warn!(
                attempt = %attempt,
                max_attempts = %self.max_attempts,
                "Max upload attempts reached"
            );
            return RetryDecision::Exhausted;
        }

        let delay = self.base_delay * attempt;
        warn!(
            attempt = %attempt,
            delay_ms = %delay.as_millis(),
            error = %error,
            "Transient upload failure, retrying"
        );
        RetryDecision::Retry(delay)
    }
}
