//! Error types for log retrieval.

use thiserror::Error;

/// Errors that can abort a retrieval before a result is assembled.
///
/// The assembler collapses all of these into `success=false` plus an
/// `error` string on the final result; nothing here escapes to the
/// caller as a panic.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Invalid or incomplete configuration, including the inability to
    /// open a terminal for a secure prompt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An external command could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited with a non-zero status.
    #[error("{command} exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// A REST call returned a non-2xx status.
    #[error("{step} failed with HTTP {status}: {body}")]
    Http {
        step: &'static str,
        status: u16,
        body: String,
    },

    /// A REST call failed before any status was received.
    #[error("{step} failed: {source}")]
    Request {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A REST response body could not be decoded.
    #[error("{step} returned malformed JSON: {source}")]
    Decode {
        step: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Job details or the run list were unobtainable or empty.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
