// Job Service - submission, lookup, control and spool access over /restjobs

use crate::application::constants::JOB_ID_LOOKUP_MAX_JOBS;
use crate::domain::{
    Correlator, Job, JobFilter, JobInfo, JobList, JobSource, SpoolFile, SubmitJobRequest,
    SubmitJobResponse,
};
use crate::error::{Result, ZosmfError};
use crate::port::{ApiRequest, ZosmfTransport};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const JOBS_ROOT: [&str; 2] = ["restjobs", "jobs"];

fn jobs_path(tail: &[&str]) -> Vec<String> {
    JOBS_ROOT
        .iter()
        .chain(tail)
        .map(|segment| segment.to_string())
        .collect()
}

/// Job operations against one z/OSMF session
#[derive(Clone)]
pub struct JobService {
    transport: Arc<dyn ZosmfTransport>,
}

impl JobService {
    pub fn new(transport: Arc<dyn ZosmfTransport>) -> Self {
        Self { transport }
    }

    /// List jobs matching the filter. Accepts both `{"jobs": [...]}` and a
    /// bare array.
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<JobList> {
        let request = ApiRequest::get(jobs_path(&[])).queries(filter.to_query());
        let response = self
            .transport
            .execute(request)
            .await?
            .expect_status(&[200])?;

        let list = JobList::from_response_body(&response.body)
            .map_err(|_| ZosmfError::Decode(response.body.clone()))?;
        debug!(count = %list.len(), "Listed jobs");
        Ok(list)
    }

    /// Get a job by `jobname:jobid` or by bare job id.
    ///
    /// A bare id is resolved through a listing filtered on that id, then the
    /// job is re-read by name and id.
    pub async fn get_job(&self, identifier: &str) -> Result<Job> {
        let correlator = self.resolve(identifier).await?;
        self.get_job_by_name_id(&correlator.job_name, &correlator.job_id)
            .await
    }

    pub async fn get_job_by_name_id(&self, job_name: &str, job_id: &str) -> Result<Job> {
        let request = ApiRequest::get(jobs_path(&[job_name, job_id]));
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200])?
            .json()
    }

    /// Direct GET of `/restjobs/jobs/{correlator}`
    pub async fn get_job_by_correlator(&self, correlator: &str) -> Result<Job> {
        let request = ApiRequest::get(jobs_path(&[correlator]));
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200])?
            .json()
    }

    /// Job with its execution detail fields
    pub async fn get_job_info(&self, correlator: &str) -> Result<JobInfo> {
        let correlator: Correlator = correlator.parse()?;
        let request = ApiRequest::get(jobs_path(&[
            correlator.job_name.as_str(),
            correlator.job_id.as_str(),
        ]));
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200])?
            .json()
    }

    pub async fn get_job_status(&self, identifier: &str) -> Result<String> {
        Ok(self.get_job(identifier).await?.status)
    }

    /// Submit a job from exactly one source.
    ///
    /// JCL text goes out as `text/plain`; dataset and local file sources as
    /// JSON `{"file": ...}` bodies.
    pub async fn submit_job(&self, request: &SubmitJobRequest) -> Result<SubmitJobResponse> {
        let api_request = match request.source()? {
            JobSource::Statement(jcl) => ApiRequest::put(jobs_path(&[])).text(jcl),
            JobSource::Dataset { name, volume } => {
                let file = if name.starts_with("//") {
                    name.to_string()
                } else {
                    format!("//{}", name)
                };
                let mut body = json!({ "file": file });
                if let Some(volume) = volume {
                    body["volume"] = volume.into();
                }
                ApiRequest::put(jobs_path(&[])).json(body)
            }
            JobSource::LocalFile {
                path,
                directory,
                extension,
            } => {
                let mut body = json!({ "file": path });
                if let Some(directory) = directory {
                    body["directory"] = directory.into();
                }
                if let Some(extension) = extension {
                    body["extension"] = extension.into();
                }
                ApiRequest::put(jobs_path(&[])).json(body)
            }
        };

        let response: SubmitJobResponse = self
            .transport
            .execute(api_request)
            .await?
            .expect_status(&[200, 201, 202])?
            .json()?;

        info!(
            job_name = %response.job_name,
            job_id = %response.job_id,
            status = %response.status,
            "Job submitted"
        );
        Ok(response)
    }

    pub async fn submit_job_statement(&self, jcl: &str) -> Result<SubmitJobResponse> {
        self.submit_job(&SubmitJobRequest::statement(jcl)).await
    }

    /// Submit the JCL stored in a dataset.
    ///
    /// A leading `//` and a leading `<session user>.` qualifier are stripped
    /// from the name before submission.
    pub async fn submit_job_from_dataset(
        &self,
        dataset: &str,
        volume: Option<&str>,
    ) -> Result<SubmitJobResponse> {
        let dataset = dataset.strip_prefix("//").unwrap_or(dataset);
        let user_prefix = format!("{}.", self.transport.user());
        let dataset = dataset.strip_prefix(&user_prefix).unwrap_or(dataset);

        let request = SubmitJobRequest::dataset(dataset, volume.map(str::to_string));
        self.submit_job(&request).await
    }

    pub async fn submit_job_from_local_file(
        &self,
        path: &str,
        directory: Option<&str>,
        extension: Option<&str>,
    ) -> Result<SubmitJobResponse> {
        let request = SubmitJobRequest::local_file(
            path,
            directory.map(str::to_string),
            extension.map(str::to_string),
        );
        self.submit_job(&request).await
    }

    /// `PUT /restjobs/jobs/{correlator}/cancel`
    pub async fn cancel_job(&self, correlator: &str) -> Result<()> {
        self.job_action(correlator, "cancel").await?;
        info!(correlator = %correlator, "Job cancelled");
        Ok(())
    }

    /// `PUT /restjobs/jobs/{correlator}/purge`
    pub async fn purge_job(&self, correlator: &str) -> Result<()> {
        self.job_action(correlator, "purge").await?;
        info!(correlator = %correlator, "Job purged");
        Ok(())
    }

    async fn job_action(&self, correlator: &str, action: &str) -> Result<()> {
        let request = ApiRequest::put(jobs_path(&[correlator, action]));
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200, 202, 204])?;
        Ok(())
    }

    pub async fn delete_job(&self, correlator: &str) -> Result<()> {
        let correlator: Correlator = correlator.parse()?;
        self.delete_job_by_name_id(&correlator.job_name, &correlator.job_id)
            .await
    }

    pub async fn delete_job_by_name_id(&self, job_name: &str, job_id: &str) -> Result<()> {
        let request = ApiRequest::delete(jobs_path(&[job_name, job_id]));
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200, 202, 204])?;
        info!(job_name = %job_name, job_id = %job_id, "Job deleted");
        Ok(())
    }

    pub async fn get_spool_files(&self, job_name: &str, job_id: &str) -> Result<Vec<SpoolFile>> {
        let request = ApiRequest::get(jobs_path(&[job_name, job_id, "files"]));
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200])?
            .json()
    }

    /// Raw text of one spool file
    pub async fn get_spool_file_content(
        &self,
        job_name: &str,
        job_id: &str,
        spool_id: i64,
    ) -> Result<String> {
        let spool_id = spool_id.to_string();
        let request = ApiRequest::get(jobs_path(&[job_name, job_id, "files", spool_id.as_str(), "records"]));
        let response = self
            .transport
            .execute(request)
            .await?
            .expect_status(&[200])?;
        Ok(response.body)
    }

    pub async fn get_spool_files_by_correlator(&self, correlator: &str) -> Result<Vec<SpoolFile>> {
        let correlator: Correlator = correlator.parse()?;
        self.get_spool_files(&correlator.job_name, &correlator.job_id)
            .await
    }

    pub async fn get_spool_file_content_by_correlator(
        &self,
        correlator: &str,
        spool_id: i64,
    ) -> Result<String> {
        let correlator: Correlator = correlator.parse()?;
        self.get_spool_file_content(&correlator.job_name, &correlator.job_id, spool_id)
            .await
    }

    pub async fn jobs_by_owner(&self, owner: &str, max_jobs: u32) -> Result<JobList> {
        self.list_jobs(&JobFilter {
            owner: Some(owner.to_string()),
            max_jobs: Some(max_jobs),
            ..Default::default()
        })
        .await
    }

    pub async fn jobs_by_prefix(&self, prefix: &str, max_jobs: u32) -> Result<JobList> {
        self.list_jobs(&JobFilter {
            prefix: Some(prefix.to_string()),
            max_jobs: Some(max_jobs),
            ..Default::default()
        })
        .await
    }

    pub async fn jobs_by_status(&self, status: &str, max_jobs: u32) -> Result<JobList> {
        self.list_jobs(&JobFilter {
            status: Some(status.to_string()),
            max_jobs: Some(max_jobs),
            ..Default::default()
        })
        .await
    }

    /// All spool output of a job, keyed by DD name.
    ///
    /// DDs whose content cannot be fetched are left out.
    pub async fn get_job_output(&self, identifier: &str) -> Result<BTreeMap<String, String>> {
        let correlator = self.resolve(identifier).await?;
        let files = self
            .get_spool_files(&correlator.job_name, &correlator.job_id)
            .await?;

        let mut output = BTreeMap::new();
        for file in files {
            match self
                .get_spool_file_content(&correlator.job_name, &correlator.job_id, file.id)
                .await
            {
                Ok(content) => {
                    output.insert(file.dd_name, content);
                }
                Err(e) => {
                    warn!(
                        correlator = %correlator,
                        dd_name = %file.dd_name,
                        error = %e,
                        "Skipping spool file"
                    );
                }
            }
        }
        Ok(output)
    }

    /// Spool output of a single DD; fails when the DD is absent or unreadable
    pub async fn get_job_output_by_dd_name(&self, identifier: &str, dd_name: &str) -> Result<String> {
        let correlator = self.resolve(identifier).await?;
        let files = self
            .get_spool_files(&correlator.job_name, &correlator.job_id)
            .await?;

        let file = files
            .iter()
            .find(|f| f.dd_name == dd_name)
            .ok_or_else(|| {
                ZosmfError::NotFound(format!("DD name {} not found for job {}", dd_name, identifier))
            })?;

        self.get_spool_file_content(&correlator.job_name, &correlator.job_id, file.id)
            .await
    }

    /// Release this handle to the session's connection pool
    pub fn close(self) {
        debug!(base_url = %self.transport.base_url(), "Job service closed");
    }

    /// `jobname:jobid` for a correlator or bare job id
    async fn resolve(&self, identifier: &str) -> Result<Correlator> {
        if Correlator::is_correlator(identifier) {
            return Ok(identifier.parse()?);
        }

        let list = self
            .list_jobs(&JobFilter {
                job_id: Some(identifier.to_string()),
                max_jobs: Some(JOB_ID_LOOKUP_MAX_JOBS),
                ..Default::default()
            })
            .await?;

        list.find_by_id(identifier)
            .map(Job::correlator)
            .ok_or_else(|| ZosmfError::NotFound(format!("job with ID {} not found", identifier)))
    }
}
