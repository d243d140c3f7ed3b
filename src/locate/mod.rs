//! Per-stream log resolution.
//!
//! Given the paths a job report names, each stream is resolved
//! independently: direct file read first, the log-fetch command as a
//! fallback, "Not available" as the terminal state. Failure on one
//! stream never blocks the other.

use std::fs;

use crate::error::RetrieveError;
use crate::retrieval::LogStream;

/// Which log stream an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// Fallback used when a reported log path cannot be read directly.
pub trait LogFallback {
    fn fetch(&self, job_name: &str, kind: StreamKind) -> Result<(), RetrieveError>;
}

/// Resolves one job's log streams.
pub struct LogLocator<'a> {
    job_name: &'a str,
    fallback: &'a dyn LogFallback,
}

impl<'a> LogLocator<'a> {
    pub fn new(job_name: &'a str, fallback: &'a dyn LogFallback) -> Self {
        LogLocator { job_name, fallback }
    }

    /// Resolve a single stream.
    ///
    /// An unset path means the stream does not exist for this job. A
    /// failed fallback degrades this stream to "Not available" rather
    /// than failing the whole retrieval.
    pub fn resolve(&self, path: Option<&str>, kind: StreamKind) -> LogStream {
        let Some(path) = path else {
            return LogStream::NotAvailable;
        };

        match fs::read_to_string(path) {
            Ok(content) => LogStream::Content(content),
            Err(read_err) => {
                eprintln!(
                    "Direct access to {} failed ({}); retrieving via log-fetch command...",
                    path, read_err
                );
                match self.fallback.fetch(self.job_name, kind) {
                    Ok(()) => LogStream::Streamed,
                    Err(fetch_err) => {
                        eprintln!("Log-fetch fallback failed: {}", fetch_err);
                        LogStream::NotAvailable
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct RecordingFallback {
        calls: RefCell<Vec<StreamKind>>,
        fail: bool,
    }

    impl RecordingFallback {
        fn new(fail: bool) -> Self {
            RecordingFallback {
                calls: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl LogFallback for RecordingFallback {
        fn fetch(&self, _job_name: &str, kind: StreamKind) -> Result<(), RetrieveError> {
            self.calls.borrow_mut().push(kind);
            if self.fail {
                Err(RetrieveError::CommandFailed {
                    command: "autosyslog".to_string(),
                    code: 1,
                    stderr: "connection refused".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_readable_file_returns_exact_contents() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "done\n").unwrap();

        let fallback = RecordingFallback::new(false);
        let locator = LogLocator::new("daily_backup", &fallback);
        let path = file.path().display().to_string();

        let stream = locator.resolve(Some(&path), StreamKind::Stdout);

        assert_eq!(stream, LogStream::Content("done\n".to_string()));
        assert!(fallback.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_file_invokes_fallback() {
        let fallback = RecordingFallback::new(false);
        let locator = LogLocator::new("daily_backup", &fallback);

        let stream = locator.resolve(Some("/nonexistent/daily_backup.out"), StreamKind::Stdout);

        assert_eq!(stream, LogStream::Streamed);
        assert_eq!(fallback.calls.borrow().as_slice(), &[StreamKind::Stdout]);
    }

    #[test]
    fn test_failed_fallback_degrades_to_not_available() {
        let fallback = RecordingFallback::new(true);
        let locator = LogLocator::new("daily_backup", &fallback);

        let stream = locator.resolve(Some("/nonexistent/daily_backup.err"), StreamKind::Stderr);

        assert_eq!(stream, LogStream::NotAvailable);
        assert_eq!(fallback.calls.borrow().as_slice(), &[StreamKind::Stderr]);
    }

    #[test]
    fn test_unset_path_is_terminal_without_fallback() {
        let fallback = RecordingFallback::new(false);
        let locator = LogLocator::new("daily_backup", &fallback);

        let stream = locator.resolve(None, StreamKind::Stderr);

        assert_eq!(stream, LogStream::NotAvailable);
        assert!(fallback.calls.borrow().is_empty());
    }
}
