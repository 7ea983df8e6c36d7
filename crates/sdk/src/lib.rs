//! z/OSMF SDK - Rust Client Library
//!
//! Submit and inspect z/OS jobs and manage datasets through the z/OSMF REST
//! services.
//!
//! # Example
//!
//! ```no_run
//! use zosmf_sdk::{config, ZosmfClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let profile = config::profile_from_env("default")?;
//!     let client = ZosmfClient::from_profile(&profile)?;
//!
//!     client.datasets().upload_text("IBMUSER.TEST.DATA", "Hello, World!").await?;
//!     let content = client.datasets().download_text("IBMUSER.TEST.DATA").await?;
//!     println!("{}", content);
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;
mod error;
mod session;

pub use client::ZosmfClient;
pub use error::{DomainError, Result, ZosmfError};
pub use session::Session;

pub use zosmf_core::domain::{
    Correlator, CreateDatasetRequest, Dataset, DatasetFilter, DatasetList, DatasetMember,
    DatasetType, DownloadRequest, Job, JobFilter, JobInfo, JobList, MemberList, Profile,
    RecordFormat, Space, SpaceUnit, SpoolFile, SubmitJobRequest, SubmitJobResponse,
    UploadRequest,
};
pub use zosmf_core::{DatasetService, JobService};
