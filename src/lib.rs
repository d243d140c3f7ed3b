//! AutoSys job log retriever.
//!
//! Fetches execution status and stdout/stderr logs for the most recent
//! run of a job managed by AutoSys, through either the command-line
//! reporting utilities (`autorep`/`autosyslog`) or the AEWS REST API.
//! Both access paths produce the same normalized `RetrievalResult`.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod locate;
pub mod report;
pub mod retrieval;

pub use auth::AuthContext;
pub use backend::{Backend, CliBackend, CliTransport, RestBackend, RunSummary, DEFAULT_REST_PORT};
pub use config::{ConfigError, Defaults};
pub use error::RetrieveError;
pub use locate::{LogFallback, LogLocator, StreamKind};
pub use report::{parse_report, JobReport};
pub use retrieval::{retrieve, LastRunInfo, LogBundle, LogStream, RetrievalResult};
