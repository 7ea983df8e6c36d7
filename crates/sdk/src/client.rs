//! z/OSMF Client Implementation

use crate::error::Result;
use crate::session::Session;
use std::sync::Arc;
use tracing::debug;
use zosmf_core::application::{DatasetService, JobService};
use zosmf_core::domain::Profile;
use zosmf_core::port::ZosmfTransport;

/// Jobs and datasets over one shared session
///
/// # Example
///
/// ```no_run
/// use zosmf_sdk::ZosmfClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ZosmfClient::direct("zos.example.com", 443, "IBMUSER", "secret")?;
///
/// let submitted = client
///     .jobs()
///     .submit_job_statement("//TESTJOB JOB (ACCT),'USER',MSGCLASS=A\n//STEP1 EXEC PGM=IEFBR14")
///     .await?;
/// let status = client
///     .jobs()
///     .wait_for_completion(&submitted.correlator().to_string())
///     .await?;
/// println!("{} finished with {}", submitted.job_id, status);
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZosmfClient {
    session: Arc<Session>,
    jobs: JobService,
    datasets: DatasetService,
}

impl ZosmfClient {
    /// Wrap a configured session. Adjust its headers before this call; the
    /// session is shared read-only afterwards.
    pub fn new(session: Session) -> Self {
        let session = Arc::new(session);
        let transport: Arc<dyn ZosmfTransport> = session.clone();
        Self {
            session,
            jobs: JobService::new(transport.clone()),
            datasets: DatasetService::new(transport),
        }
    }

    pub fn from_profile(profile: &Profile) -> Result<Self> {
        Ok(Self::new(Session::new(profile)?))
    }

    /// Connect with TLS verification on and the default `/zosmf` base path
    pub fn direct(host: &str, port: u16, user: &str, password: &str) -> Result<Self> {
        Self::from_profile(&Profile::new("", host, port, user, password))
    }

    pub fn direct_with_options(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        reject_unauthorized: bool,
        base_path: &str,
    ) -> Result<Self> {
        Self::from_profile(&Profile::with_options(
            "",
            host,
            port,
            user,
            password,
            reject_unauthorized,
            base_path,
        ))
    }

    pub fn jobs(&self) -> &JobService {
        &self.jobs
    }

    pub fn datasets(&self) -> &DatasetService {
        &self.datasets
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drop this client's handles; pooled connections close once the last
    /// handle to the session is gone.
    pub fn close(self) {
        debug!(base_url = %self.session.base_url(), "Client closed");
        self.jobs.close();
        self.datasets.close();
    }
}
