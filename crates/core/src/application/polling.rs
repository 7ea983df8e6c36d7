// Job completion polling

use crate::application::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use crate::application::JobService;
use crate::domain::is_job_complete;
use crate::error::{Result, ZosmfError};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

impl JobService {
    /// Poll a job until its status reports completion.
    ///
    /// Each iteration checks the deadline, fetches the status, then sleeps
    /// `poll_interval`. A failed status fetch ends the wait at once.
    pub async fn wait_for_job_completion(
        &self,
        identifier: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<String> {
        let started = Instant::now();

        loop {
            if started.elapsed() > timeout {
                return Err(ZosmfError::Timeout(format!(
                    "timeout waiting for job {} to complete",
                    identifier
                )));
            }

            let status = self.get_job_status(identifier).await?;
            if is_job_complete(&status) {
                info!(
                    job = %identifier,
                    status = %status,
                    elapsed_ms = %started.elapsed().as_millis(),
                    "Job completed"
                );
                return Ok(status);
            }

            debug!(job = %identifier, status = %status, "Job still running");
            sleep(poll_interval).await;
        }
    }

    /// Wait with a 5 minute limit, polling every 5 seconds
    pub async fn wait_for_completion(&self, identifier: &str) -> Result<String> {
        self.wait_for_job_completion(identifier, DEFAULT_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL)
            .await
    }
}
