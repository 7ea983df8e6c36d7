// Central Error Type for the Client

use thiserror::Error;

/// Client-level error type
#[derive(Error, Debug)]
pub enum ZosmfError {
    #[error("Validation error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// Non-success HTTP status. Status and body are carried verbatim.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Upload failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<ZosmfError>,
    },

    #[error("PDS directory error for member {member} in {dataset}: {source}. {guidance}")]
    PdsDirectory {
        dataset: String,
        member: String,
        guidance: &'static str,
        #[source]
        source: Box<ZosmfError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ZosmfError {
    /// HTTP status of the underlying API failure, looking through wrappers.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ZosmfError::Api { status, .. } => Some(*status),
            ZosmfError::RetriesExhausted { source, .. } | ZosmfError::PdsDirectory { source, .. } => {
                source.status_code()
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ZosmfError::NotFound(_)) || self.status_code() == Some(404)
    }
}

/// Result type alias using ZosmfError
pub type Result<T> = std::result::Result<T, ZosmfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_embeds_status_and_body() {
        let err = ZosmfError::Api {
            status: 404,
            body: "{\"message\":\"not here\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 404: {\"message\":\"not here\"}"
        );
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_code_through_retry_wrapper() {
        let err = ZosmfError::RetriesExhausted {
            attempts: 3,
            source: Box::new(ZosmfError::Api {
                status: 500,
                body: "ISRZ002 Deallocation failed".to_string(),
            }),
        };
        assert_eq!(err.status_code(), Some(500));
        assert!(err.to_string().starts_with("Upload failed after 3 attempts"));
    }
}
