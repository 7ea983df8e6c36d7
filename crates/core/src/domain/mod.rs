// Domain Layer - z/OSMF resources, naming rules and request validation

pub mod dataset;
pub mod error;
pub mod jcl;
pub mod job;
pub mod naming;
pub mod profile;

// Re-exports
pub use dataset::{
    CreateDatasetRequest, Dataset, DatasetFilter, DatasetList, DatasetMember, DatasetTransfer,
    DatasetType, DownloadRequest, MemberList, RecordFormat, Space, SpaceUnit, UploadRequest,
};
pub use error::DomainError;
pub use jcl::{create_job_with_step, create_simple_job_statement};
pub use job::{
    is_job_complete, validate_job_request, Correlator, Job, JobFilter, JobInfo, JobList,
    JobSource, SpoolFile, SubmitJobRequest, SubmitJobResponse,
};
pub use naming::{
    is_valid_dataset_name, is_valid_member_name, validate_dataset_name, validate_member_name,
};
pub use profile::Profile;
