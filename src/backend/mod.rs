//! Backend abstraction over the two AutoSys access paths.
//!
//! The command-line utilities and the AEWS REST API expose the same
//! capability set: fetch job details, identify the most recent run,
//! fetch log content. The assembler in `retrieval` is written once
//! against this trait instead of per backend.

mod cli;
mod rest;

pub use cli::{CliBackend, CliTransport};
pub use rest::{RestBackend, DEFAULT_REST_PORT};

use serde::{Deserialize, Serialize};

use crate::error::RetrieveError;
use crate::report::JobReport;
use crate::retrieval::LogBundle;

/// One entry from the REST run listing. The API orders entries newest
/// first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// A single AutoSys access path.
///
/// Authentication is passed in at construction; implementations hold no
/// global state, and one instance serves one invocation.
pub trait Backend {
    /// Fetch job status and, where the backend knows them, log
    /// locations.
    fn job_details(&self, job_name: &str) -> Result<JobReport, RetrieveError>;

    /// Identify the most recent run. `Ok(None)` means the backend has
    /// no run listing and the report's own last-run field stands in.
    fn latest_run(
        &self,
        job_name: &str,
        report: &JobReport,
    ) -> Result<Option<RunSummary>, RetrieveError>;

    /// Fetch the stdout/stderr pair for the most recent run.
    fn fetch_logs(
        &self,
        job_name: &str,
        report: &JobReport,
        run: Option<&RunSummary>,
    ) -> Result<LogBundle, RetrieveError>;
}
