// Client constants - no magic values
use std::time::Duration;

/// Per-request HTTP timeout (30s)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Jobs listed when resolving a bare job id to its job name
pub const JOB_ID_LOOKUP_MAX_JOBS: u32 = 100;

/// Attempts made by the member upload retry wrapper
pub const MEMBER_UPLOAD_MAX_ATTEMPTS: u32 = 3;

/// Base delay of the member upload retry; attempt N waits N x base
pub const MEMBER_UPLOAD_RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Default interval between job status polls (5s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default limit for waiting on job completion (5 minutes)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Directory blocks used when a PDS helper is asked for too few
pub const MIN_RECOMMENDED_DIRECTORY_BLOCKS: u32 = 10;

/// Requests below this directory block count get the recommended minimum
pub const DIRECTORY_BLOCKS_THRESHOLD: u32 = 5;

/// Directory blocks for partitioned datasets created without one
pub const DEFAULT_DIRECTORY_BLOCKS: u32 = 5;

/// Encoding requested by the plain-text download helpers
pub const DEFAULT_TEXT_ENCODING: &str = "UTF-8";
