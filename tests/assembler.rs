//! Assembler behavior against scripted backends: short-circuiting,
//! run selection, partial availability.

use std::cell::Cell;

use autosys_logs::{
    retrieve, Backend, JobReport, LogBundle, LogStream, RetrieveError, RunSummary,
};

/// Backend whose three calls are scripted per test, with call counters
/// to verify short-circuiting.
#[derive(Default)]
struct ScriptedBackend {
    details_http_failure: Option<u16>,
    runs: Vec<RunSummary>,
    has_run_listing: bool,
    stdout: Option<String>,
    stderr: Option<String>,
    runs_calls: Cell<u32>,
    logs_calls: Cell<u32>,
}

impl Backend for ScriptedBackend {
    fn job_details(&self, job_name: &str) -> Result<JobReport, RetrieveError> {
        if let Some(status) = self.details_http_failure {
            return Err(RetrieveError::Http {
                step: "job details",
                status,
                body: "Job not found".to_string(),
            });
        }
        Ok(JobReport {
            job_name: job_name.to_string(),
            status: Some("SUCCESS".to_string()),
            ..JobReport::default()
        })
    }

    fn latest_run(
        &self,
        job_name: &str,
        _report: &JobReport,
    ) -> Result<Option<RunSummary>, RetrieveError> {
        self.runs_calls.set(self.runs_calls.get() + 1);
        if !self.has_run_listing {
            return Ok(None);
        }
        match self.runs.first() {
            Some(run) => Ok(Some(run.clone())),
            None => Err(RetrieveError::NotFound(format!(
                "no runs found for job '{}'",
                job_name
            ))),
        }
    }

    fn fetch_logs(
        &self,
        _job_name: &str,
        _report: &JobReport,
        _run: Option<&RunSummary>,
    ) -> Result<LogBundle, RetrieveError> {
        self.logs_calls.set(self.logs_calls.get() + 1);
        Ok(LogBundle {
            stdout: self
                .stdout
                .clone()
                .map_or(LogStream::NotAvailable, LogStream::Content),
            stderr: self
                .stderr
                .clone()
                .map_or(LogStream::NotAvailable, LogStream::Content),
        })
    }
}

fn run(id: i64) -> RunSummary {
    RunSummary {
        id,
        status: Some("SUCCESS".to_string()),
        start_time: Some("2025-04-09T10:00:00".to_string()),
        end_time: Some("2025-04-09T10:05:00".to_string()),
    }
}

#[test]
fn test_details_failure_skips_all_later_calls() {
    let backend = ScriptedBackend {
        details_http_failure: Some(404),
        ..ScriptedBackend::default()
    };

    let result = retrieve(&backend, "weekly_report");

    assert!(!result.success);
    assert!(result.error.unwrap().contains("404"));
    assert_eq!(backend.runs_calls.get(), 0);
    assert_eq!(backend.logs_calls.get(), 0);
}

#[test]
fn test_empty_run_list_is_reported_and_skips_log_fetch() {
    let backend = ScriptedBackend {
        has_run_listing: true,
        ..ScriptedBackend::default()
    };

    let result = retrieve(&backend, "weekly_report");

    assert!(!result.success);
    assert!(result.error.unwrap().contains("no runs"));
    assert_eq!(backend.logs_calls.get(), 0);
}

#[test]
fn test_newest_run_is_selected() {
    let backend = ScriptedBackend {
        has_run_listing: true,
        runs: vec![run(42), run(41)],
        stdout: Some("done\n".to_string()),
        stderr: Some(String::new()),
        ..ScriptedBackend::default()
    };

    let result = retrieve(&backend, "weekly_report");

    assert!(result.success);
    assert_eq!(result.last_run.unwrap().id, Some(42));
}

#[test]
fn test_partial_availability_is_still_success() {
    let backend = ScriptedBackend {
        has_run_listing: true,
        runs: vec![run(7)],
        stdout: Some("done\n".to_string()),
        stderr: None,
        ..ScriptedBackend::default()
    };

    let result = retrieve(&backend, "weekly_report");

    assert!(result.success);
    assert!(result.logs.stdout.is_available());
    assert_eq!(result.logs.stderr, LogStream::NotAvailable);
    assert!(result.error.is_none());
}

#[test]
fn test_result_serializes_to_the_output_contract() {
    let backend = ScriptedBackend {
        has_run_listing: true,
        runs: vec![run(42)],
        stdout: Some("done\n".to_string()),
        stderr: None,
        ..ScriptedBackend::default()
    };

    let result = retrieve(&backend, "weekly_report");
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    assert_eq!(json["job_name"], "weekly_report");
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["last_run"]["id"], 42);
    assert_eq!(json["logs"]["stdout"], "done\n");
    assert_eq!(json["logs"]["stderr"], "Not available");
    assert!(json.get("error").is_none());
    assert!(json["retrieved_at"].is_string());
}
