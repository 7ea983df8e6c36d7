// Job Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::naming::is_valid_dataset_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status fragments that mark a job as finished.
///
/// Matching is a case-insensitive substring test; z/OSMF reports finished
/// jobs as `OUTPUT` with a separate `retcode` such as `CC 0000` or
/// `ABEND S0C7`, and some callers pass the retcode in as the status.
pub const COMPLETED_STATUSES: [&str; 7] = [
    "OUTPUT", "CC 0000", "CC 0001", "CC 0002", "CC 0003", "CC 0004", "ABEND",
];

/// Whether a job status string indicates completion
pub fn is_job_complete(status: &str) -> bool {
    let status = status.to_uppercase();
    COMPLETED_STATUSES
        .iter()
        .any(|completed| status.contains(completed))
}

/// `jobname:jobid` address of a job
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Correlator {
    pub job_name: String,
    pub job_id: String,
}

impl Correlator {
    pub fn new(job_name: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            job_id: job_id.into(),
        }
    }

    /// Whether the identifier looks like a correlator rather than a bare id
    pub fn is_correlator(identifier: &str) -> bool {
        identifier.contains(':')
    }
}

impl FromStr for Correlator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(job_name), Some(job_id), None) => Ok(Self::new(job_name, job_id)),
            _ => Err(DomainError::InvalidCorrelator(s.to_string())),
        }
    }
}

impl fmt::Display for Correlator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.job_name, self.job_id)
    }
}

/// A z/OS job as reported by `/restjobs/jobs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Job {
    #[serde(rename = "jobid")]
    pub job_id: String,
    #[serde(rename = "jobname")]
    pub job_name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsystem: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<String>,
    #[serde(
        default,
        rename = "phase",
        alias = "phase-number",
        skip_serializing_if = "Option::is_none"
    )]
    pub phase: Option<i64>,
    #[serde(default, rename = "retcode", skip_serializing_if = "Option::is_none")]
    pub ret_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_correlator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
}

impl Job {
    pub fn correlator(&self) -> Correlator {
        Correlator::new(&self.job_name, &self.job_id)
    }

    pub fn is_complete(&self) -> bool {
        is_job_complete(&self.status)
    }
}

/// Job with its timing detail fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobInfo {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_submitted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_ended: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_system: Option<String>,
}

/// A job output file (one DD)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpoolFile {
    pub id: i64,
    #[serde(rename = "ddname")]
    pub dd_name: String,
    #[serde(default, rename = "stepname", skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    #[serde(default, rename = "procstep", skip_serializing_if = "Option::is_none")]
    pub proc_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, alias = "record-count")]
    pub records: i64,
    #[serde(default, rename = "byte-count", alias = "bytes")]
    pub bytes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        rename = "records-url",
        alias = "content-url",
        skip_serializing_if = "Option::is_none"
    )]
    pub records_url: Option<String>,
}

/// List of jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// `{"jobs": [...]}`; the field is required so other objects do not match
#[derive(Deserialize)]
struct WrappedJobs {
    jobs: Vec<Job>,
}

/// The shapes z/OSMF uses for job listings
enum JobListShape {
    Wrapped(Vec<Job>),
    Bare(Vec<Job>),
    /// A literal `{}`
    EmptyObject,
}

impl JobListShape {
    fn parse(body: &str) -> std::result::Result<Self, serde_json::Error> {
        if let Ok(wrapped) = serde_json::from_str::<WrappedJobs>(body) {
            return Ok(Self::Wrapped(wrapped.jobs));
        }
        match serde_json::from_str::<Vec<Job>>(body) {
            Ok(jobs) => Ok(Self::Bare(jobs)),
            Err(e) => match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(body) {
                Ok(object) if object.is_empty() => Ok(Self::EmptyObject),
                _ => Err(e),
            },
        }
    }
}

impl JobList {
    /// Parse a listing body: `{"jobs": [...]}` first, then a bare `[...]`.
    ///
    /// `{}` is an empty listing. Any other object without a `jobs` array is
    /// a decode error.
    pub fn from_response_body(body: &str) -> std::result::Result<Self, serde_json::Error> {
        let jobs = match JobListShape::parse(body)? {
            JobListShape::Wrapped(jobs) | JobListShape::Bare(jobs) => jobs,
            JobListShape::EmptyObject => Vec::new(),
        };
        Ok(JobList { jobs })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn find_by_id(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }
}

/// Query filters for job listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub owner: Option<String>,
    pub prefix: Option<String>,
    pub max_jobs: Option<u32>,
    pub job_id: Option<String>,
    pub job_name: Option<String>,
    pub status: Option<String>,
    pub user_correlator: Option<String>,
}

impl JobFilter {
    /// Query parameters for the set fields, in wire naming
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: &Option<String>| {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                query.push((key.to_string(), v.to_string()));
            }
        };

        push("owner", &self.owner);
        push("prefix", &self.prefix);
        push("jobid", &self.job_id);
        push("jobname", &self.job_name);
        push("status", &self.status);
        push("user-correlator", &self.user_correlator);

        if let Some(max) = self.max_jobs.filter(|m| *m > 0) {
            query.push(("max-jobs".to_string(), max.to_string()));
        }

        query
    }
}

/// Job submission request. Exactly one source must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitJobRequest {
    pub job_statement: Option<String>,
    pub job_dataset: Option<String>,
    pub job_local_file: Option<String>,
    pub directory: Option<String>,
    pub extension: Option<String>,
    pub volume: Option<String>,
}

/// The resolved source of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSource<'a> {
    Statement(&'a str),
    Dataset {
        name: &'a str,
        volume: Option<&'a str>,
    },
    LocalFile {
        path: &'a str,
        directory: Option<&'a str>,
        extension: Option<&'a str>,
    },
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SubmitJobRequest {
    pub fn statement(jcl: impl Into<String>) -> Self {
        Self {
            job_statement: Some(jcl.into()),
            ..Default::default()
        }
    }

    pub fn dataset(name: impl Into<String>, volume: Option<String>) -> Self {
        Self {
            job_dataset: Some(name.into()),
            volume,
            ..Default::default()
        }
    }

    pub fn local_file(
        path: impl Into<String>,
        directory: Option<String>,
        extension: Option<String>,
    ) -> Self {
        Self {
            job_local_file: Some(path.into()),
            directory,
            extension,
            ..Default::default()
        }
    }

    /// Resolve the single job source, failing when none or several are set
    pub fn source(&self) -> Result<JobSource<'_>> {
        let statement = non_empty(&self.job_statement);
        let dataset = non_empty(&self.job_dataset);
        let local_file = non_empty(&self.job_local_file);

        match (statement, dataset, local_file) {
            (Some(jcl), None, None) => Ok(JobSource::Statement(jcl)),
            (None, Some(name), None) => Ok(JobSource::Dataset {
                name,
                volume: non_empty(&self.volume),
            }),
            (None, None, Some(path)) => Ok(JobSource::LocalFile {
                path,
                directory: non_empty(&self.directory),
                extension: non_empty(&self.extension),
            }),
            (None, None, None) => Err(DomainError::InvalidJobRequest(
                "no job source specified (jobStatement, jobDataSet, or jobLocalFile)".to_string(),
            )),
            _ => Err(DomainError::InvalidJobRequest(
                "only one job source may be specified (jobStatement, jobDataSet, or jobLocalFile)"
                    .to_string(),
            )),
        }
    }
}

/// Content checks on whichever sources are set.
///
/// At least one source is required; several may be set. JCL text must carry
/// a JOB card and a dataset source must be a valid dataset name as given.
pub fn validate_job_request(request: &SubmitJobRequest) -> Result<()> {
    let statement = non_empty(&request.job_statement);
    let dataset = non_empty(&request.job_dataset);
    let local_file = non_empty(&request.job_local_file);

    if statement.is_none() && dataset.is_none() && local_file.is_none() {
        return Err(DomainError::InvalidJobRequest(
            "at least one job source must be specified (jobStatement, jobDataSet, or jobLocalFile)"
                .to_string(),
        ));
    }
    if let Some(jcl) = statement {
        if !jcl.to_uppercase().contains("JOB") {
            return Err(DomainError::InvalidJobRequest(
                "job statement must contain a JOB card".to_string(),
            ));
        }
    }
    if let Some(name) = dataset {
        if !is_valid_dataset_name(name) {
            return Err(DomainError::InvalidJobRequest(format!(
                "invalid dataset name: {}",
                name
            )));
        }
    }
    Ok(())
}

/// Response to a job submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    #[serde(rename = "jobid")]
    pub job_id: String,
    #[serde(rename = "jobname")]
    pub job_name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SubmitJobResponse {
    pub fn correlator(&self) -> Correlator {
        Correlator::new(&self.job_name, &self.job_id)
    }
}
