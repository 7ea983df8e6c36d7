//! SDK Error Types
//!
//! The SDK shares the core error type; this module maps reqwest failures
//! onto it.

pub use zosmf_core::domain::DomainError;
pub use zosmf_core::error::{Result, ZosmfError};

/// Map a reqwest failure onto the transport-level variants.
///
/// Timeouts and connection failures keep those words in their text so the
/// member upload retry recognises them.
pub(crate) fn transport_error(e: reqwest::Error) -> ZosmfError {
    if e.is_timeout() {
        ZosmfError::Timeout(format!("request timeout: {}", e))
    } else if e.is_connect() {
        ZosmfError::Transport(format!("connection failed: {}", e))
    } else if e.is_body() || e.is_decode() {
        ZosmfError::Transport(format!("failed to read response: {}", e))
    } else if e.is_builder() {
        ZosmfError::InvalidUrl(format!("failed to create request: {}", e))
    } else {
        ZosmfError::Transport(format!("failed to make request: {}", e))
    }
}
