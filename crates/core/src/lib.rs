// z/OSMF Core - Domain Logic, Ports & Services
// NO HTTP dependencies (hexagonal architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{DatasetService, JobService};
pub use error::{Result, ZosmfError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
