// Domain Error Types (local validation, never retried)

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid dataset name: {0}")]
    InvalidDatasetName(String),

    #[error("invalid member name: {0}")]
    InvalidMemberName(String),

    #[error("invalid correlator format: correlator must be in format 'jobname:jobid', got: {0}")]
    InvalidCorrelator(String),

    #[error("invalid job request: {0}")]
    InvalidJobRequest(String),

    #[error("invalid dataset request: {0}")]
    InvalidDatasetRequest(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
