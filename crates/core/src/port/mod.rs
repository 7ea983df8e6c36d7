// Port Layer - Interfaces for external dependencies

pub mod transport;

// Re-exports
pub use transport::{ApiRequest, ApiResponse, HttpMethod, RequestBody, ZosmfTransport};
