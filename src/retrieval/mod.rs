//! Canonical retrieval result and the assembly logic that produces it.
//!
//! `RetrievalResult` is the single externally visible output; every
//! internal failure collapses into `success=false` with `error`
//! populated. This shape is the exchange format other tooling consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::backend::Backend;
use crate::error::RetrieveError;

/// One log stream's outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum LogStream {
    /// Full contents fetched as a string.
    Content(String),
    /// Content was streamed directly to the console by the log-fetch
    /// fallback command rather than captured.
    Streamed,
    /// No path or content exists for this stream. A legitimate terminal
    /// state, not an error.
    NotAvailable,
}

impl LogStream {
    pub fn is_available(&self) -> bool {
        !matches!(self, LogStream::NotAvailable)
    }
}

impl Serialize for LogStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LogStream::Content(text) => serializer.serialize_str(text),
            LogStream::Streamed => serializer.serialize_str("Streamed to console"),
            LogStream::NotAvailable => serializer.serialize_str("Not available"),
        }
    }
}

/// Stdout/stderr pair for the most recent run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogBundle {
    pub stdout: LogStream,
    pub stderr: LogStream,
}

impl LogBundle {
    pub fn not_available() -> Self {
        LogBundle {
            stdout: LogStream::NotAvailable,
            stderr: LogStream::NotAvailable,
        }
    }
}

/// Most-recent-run details included in a successful result.
///
/// The REST backend fills `id`/`start_time`/`end_time` from the run
/// listing; the CLI backend only knows the report's `Last Run`
/// timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LastRunInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// The single externally visible output of a retrieval.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    pub job_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<LastRunInfo>,
    pub logs: LogBundle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    pub retrieved_at: DateTime<Utc>,
}

impl RetrievalResult {
    /// A failed result carrying only the job name and the error.
    pub fn failure(job_name: &str, error: impl Into<String>) -> Self {
        RetrievalResult {
            job_name: job_name.to_string(),
            success: false,
            status: None,
            last_run: None,
            logs: LogBundle::not_available(),
            error: Some(error.into()),
            metadata: BTreeMap::new(),
            retrieved_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the full retrieval pipeline against one backend.
///
/// Never returns an error: a failure at the job-details or run-list
/// stage short-circuits into `success=false` without attempting log
/// retrieval, and log fetch failures surface the same way.
pub fn retrieve(backend: &dyn Backend, job_name: &str) -> RetrievalResult {
    match retrieve_inner(backend, job_name) {
        Ok(result) => result,
        Err(err) => RetrievalResult::failure(job_name, err.to_string()),
    }
}

fn retrieve_inner(
    backend: &dyn Backend,
    job_name: &str,
) -> Result<RetrievalResult, RetrieveError> {
    let report = backend.job_details(job_name)?;
    let run = backend.latest_run(job_name, &report)?;
    let logs = backend.fetch_logs(job_name, &report, run.as_ref())?;

    let last_run = match run {
        Some(run) => Some(LastRunInfo {
            id: Some(run.id),
            status: run.status,
            timestamp: None,
            start_time: run.start_time,
            end_time: run.end_time,
        }),
        None => report.last_run.clone().map(|timestamp| LastRunInfo {
            timestamp: Some(timestamp),
            ..LastRunInfo::default()
        }),
    };

    Ok(RetrievalResult {
        job_name: job_name.to_string(),
        success: true,
        status: Some(report.status.clone().unwrap_or_else(|| "Unknown".to_string())),
        last_run,
        logs,
        error: None,
        metadata: report.metadata,
        retrieved_at: Utc::now(),
    })
}
