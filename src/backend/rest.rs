//! REST transport for the AutoSys AEWS API.
//!
//! Three dependent GET calls: job details, run list, run logs. Each
//! carries HTTP basic authentication and a JSON accept header. Any
//! non-2xx response aborts the chain immediately with the failing step
//! identified; there are no retries.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::auth::AuthContext;
use crate::error::RetrieveError;
use crate::report::JobReport;
use crate::retrieval::{LogBundle, LogStream};

use super::{Backend, RunSummary};

/// Default AEWS API port.
pub const DEFAULT_REST_PORT: u16 = 8443;

const BODY_SNIPPET_LEN: usize = 200;

/// Job details payload, reduced to the fields this tool consumes.
#[derive(Debug, Deserialize)]
struct JobDetailsResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Run logs payload.
#[derive(Debug, Deserialize)]
struct RunLogsResponse {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
}

/// REST access path against `https://{server}:{port}/AEWS/rest`.
#[derive(Debug)]
pub struct RestBackend {
    base_url: String,
    instance: String,
    auth_header: String,
    client: Client,
}

impl RestBackend {
    /// Build a REST backend from a resolved auth context.
    ///
    /// Unlike the CLI path there is no ambient authentication: server,
    /// instance, username and password are all required.
    pub fn new(auth: &AuthContext, port: u16) -> Result<Self, RetrieveError> {
        let server = auth.server.as_deref().ok_or_else(|| {
            RetrieveError::Configuration(
                "REST backend requires a server (-s/--server)".to_string(),
            )
        })?;
        let instance = auth.instance.as_deref().ok_or_else(|| {
            RetrieveError::Configuration(
                "REST backend requires an instance (-i/--instance)".to_string(),
            )
        })?;
        let (username, password) = match (auth.username.as_deref(), auth.password.as_deref()) {
            (Some(user), Some(pass)) => (user, pass),
            _ => {
                return Err(RetrieveError::Configuration(
                    "REST backend requires explicit credentials (-u/--user and a password)"
                        .to_string(),
                ))
            }
        };

        let mut builder = Client::builder();
        if auth.trust_all_certificates {
            // Explicit caller opt-in; never the default.
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder.build().map_err(|source| RetrieveError::Request {
            step: "client setup",
            source,
        })?;

        let token = BASE64.encode(format!("{}:{}", username, password));

        Ok(RestBackend {
            base_url: format!("https://{}:{}/AEWS/rest", server, port),
            instance: instance.to_string(),
            auth_header: format!("Basic {}", token),
            client,
        })
    }

    fn job_url(&self, job_name: &str) -> String {
        format!("{}/job/{}/{}", self.base_url, self.instance, job_name)
    }

    fn get(&self, step: &'static str, url: &str) -> Result<String, RetrieveError> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|source| RetrieveError::Request { step, source })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(RetrieveError::Http {
                step,
                status: status.as_u16(),
                body: snippet(&body),
            });
        }
        Ok(body)
    }
}

impl Backend for RestBackend {
    fn job_details(&self, job_name: &str) -> Result<JobReport, RetrieveError> {
        let body = self.get("job details", &self.job_url(job_name))?;
        let details: JobDetailsResponse =
            serde_json::from_str(&body).map_err(|source| RetrieveError::Decode {
                step: "job details",
                source,
            })?;

        Ok(JobReport {
            job_name: job_name.to_string(),
            status: details.status,
            ..JobReport::default()
        })
    }

    fn latest_run(
        &self,
        job_name: &str,
        _report: &JobReport,
    ) -> Result<Option<RunSummary>, RetrieveError> {
        let url = format!("{}/runs", self.job_url(job_name));
        let body = self.get("run list", &url)?;
        let runs: Vec<RunSummary> =
            serde_json::from_str(&body).map_err(|source| RetrieveError::Decode {
                step: "run list",
                source,
            })?;

        select_latest(job_name, runs).map(Some)
    }

    fn fetch_logs(
        &self,
        job_name: &str,
        _report: &JobReport,
        run: Option<&RunSummary>,
    ) -> Result<LogBundle, RetrieveError> {
        let run = run.ok_or_else(|| {
            RetrieveError::NotFound(format!("no run selected for job '{}'", job_name))
        })?;

        let url = format!("{}/runs/{}/logs", self.job_url(job_name), run.id);
        let body = self.get("run logs", &url)?;
        let logs: RunLogsResponse =
            serde_json::from_str(&body).map_err(|source| RetrieveError::Decode {
                step: "run logs",
                source,
            })?;

        Ok(LogBundle {
            stdout: logs.stdout.map_or(LogStream::NotAvailable, LogStream::Content),
            stderr: logs.stderr.map_or(LogStream::NotAvailable, LogStream::Content),
        })
    }
}

/// Pick the most recent run from a newest-first listing.
fn select_latest(job_name: &str, runs: Vec<RunSummary>) -> Result<RunSummary, RetrieveError> {
    runs.into_iter().next().ok_or_else(|| {
        RetrieveError::NotFound(format!("no runs found for job '{}'", job_name))
    })
}

/// First `BODY_SNIPPET_LEN` characters of an error body.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
