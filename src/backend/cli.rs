//! CLI transport: `autorep` for job reports, `autosyslog` for log
//! streaming.
//!
//! Both commands block until the external process exits; no timeout is
//! enforced here. The log-fetch command's stdout is inherited so its
//! content reaches the user directly, while its stderr is captured to a
//! private temp file and only read back on failure.

use std::fs;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

use crate::auth::AuthContext;
use crate::error::RetrieveError;
use crate::locate::{LogFallback, LogLocator, StreamKind};
use crate::report::{parse_report, JobReport};
use crate::retrieval::LogBundle;

use super::{Backend, RunSummary};

const REPORT_COMMAND: &str = "autorep";
const LOG_COMMAND: &str = "autosyslog";

/// Invokes the AutoSys command-line utilities with explicit
/// authentication arguments.
#[derive(Debug, Clone)]
pub struct CliTransport {
    auth: AuthContext,
    report_command: String,
    log_command: String,
}

impl CliTransport {
    pub fn new(auth: AuthContext) -> Self {
        Self::with_commands(auth, REPORT_COMMAND, LOG_COMMAND)
    }

    /// Override the command names. Tests substitute stand-in scripts.
    pub fn with_commands(auth: AuthContext, report_command: &str, log_command: &str) -> Self {
        CliTransport {
            auth,
            report_command: report_command.to_string(),
            log_command: log_command.to_string(),
        }
    }

    /// Run `autorep -j <job> -L` and capture its stdout.
    ///
    /// A non-zero exit is a hard failure carrying the captured stderr;
    /// there is no automatic retry.
    pub fn run_report(&self, job_name: &str) -> Result<String, RetrieveError> {
        let mut cmd = Command::new(&self.report_command);
        cmd.arg("-j").arg(job_name).arg("-L");
        self.push_auth_args(&mut cmd);

        let output = cmd.output().map_err(|source| RetrieveError::Spawn {
            command: self.report_command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(RetrieveError::CommandFailed {
                command: self.report_command.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run `autosyslog -j <job> {-o|-e}`, streaming its stdout to the
    /// console.
    pub fn stream_log(&self, job_name: &str, kind: StreamKind) -> Result<(), RetrieveError> {
        let stream_flag = match kind {
            StreamKind::Stdout => "-o",
            StreamKind::Stderr => "-e",
        };

        let err_file = NamedTempFile::new()?;

        let mut cmd = Command::new(&self.log_command);
        cmd.arg("-j").arg(job_name).arg(stream_flag);
        self.push_auth_args(&mut cmd);

        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::from(err_file.reopen()?))
            .status()
            .map_err(|source| RetrieveError::Spawn {
                command: self.log_command.clone(),
                source,
            })?;

        if !status.success() {
            let stderr = fs::read_to_string(err_file.path()).unwrap_or_default();
            return Err(RetrieveError::CommandFailed {
                command: self.log_command.clone(),
                code: status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    fn push_auth_args(&self, cmd: &mut Command) {
        if let Some(ref user) = self.auth.username {
            cmd.arg("-u").arg(user);
        }
        if let Some(ref pass) = self.auth.password {
            cmd.arg("-p").arg(pass);
        }
        if let Some(ref instance) = self.auth.instance {
            cmd.arg("-i").arg(instance);
        }
        if let Some(ref server) = self.auth.server {
            cmd.arg("-s").arg(server);
        }
    }
}

impl LogFallback for CliTransport {
    fn fetch(&self, job_name: &str, kind: StreamKind) -> Result<(), RetrieveError> {
        self.stream_log(job_name, kind)
    }
}

/// CLI access path: report text parsing plus direct file reads with a
/// streamed fallback.
#[derive(Debug, Clone)]
pub struct CliBackend {
    transport: CliTransport,
}

impl CliBackend {
    pub fn new(auth: AuthContext) -> Self {
        CliBackend {
            transport: CliTransport::new(auth),
        }
    }

    pub fn with_transport(transport: CliTransport) -> Self {
        CliBackend { transport }
    }
}

impl Backend for CliBackend {
    fn job_details(&self, job_name: &str) -> Result<JobReport, RetrieveError> {
        let text = self.transport.run_report(job_name)?;
        Ok(parse_report(job_name, &text))
    }

    fn latest_run(
        &self,
        _job_name: &str,
        _report: &JobReport,
    ) -> Result<Option<RunSummary>, RetrieveError> {
        // autorep has no run listing; the report's Last Run field
        // stands in for run identity.
        Ok(None)
    }

    fn fetch_logs(
        &self,
        job_name: &str,
        report: &JobReport,
        _run: Option<&RunSummary>,
    ) -> Result<LogBundle, RetrieveError> {
        let locator = LogLocator::new(job_name, &self.transport);
        Ok(LogBundle {
            stdout: locator.resolve(report.std_out_file.as_deref(), StreamKind::Stdout),
            stderr: locator.resolve(report.std_err_file.as_deref(), StreamKind::Stderr),
        })
    }
}
