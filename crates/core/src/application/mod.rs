// Application Layer - z/OSMF use cases over the transport port

pub mod constants;
pub mod datasets;
pub mod jobs;
mod polling;
pub mod retry;

// Re-exports
pub use datasets::DatasetService;
pub use jobs::JobService;
pub use retry::{is_transient_directory_fault, MemberUploadRetry, RetryDecision};
