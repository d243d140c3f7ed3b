//! Parser for `autorep -j <job> -L` report text.
//!
//! autorep output is free text with labeled fields. Extraction is pure
//! regex scraping: a missing label leaves the field unset rather than
//! failing, since not every job defines every attribute. Keeping the
//! scraping behind this module means the orchestration logic never sees
//! the text format.

use std::collections::BTreeMap;
use std::path::Path;

use regex_lite::Regex;
use serde::Serialize;

/// Job attributes worth surfacing alongside status and log paths.
const METADATA_ATTRIBUTES: &[&str] = &[
    "machine",
    "box_name",
    "command",
    "condition",
    "date_conditions",
    "days_of_week",
    "start_times",
    "job_type",
    "priority",
    "max_run_alarm",
    "alarm_if_fail",
];

/// Structured view of one job report.
///
/// Produced once per query and never mutated; re-querying produces a
/// new instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobReport {
    pub job_name: String,
    pub status: Option<String>,
    pub last_run: Option<String>,
    pub std_out_file: Option<String>,
    pub std_err_file: Option<String>,
    pub job_dir: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Parse report text into a `JobReport`.
///
/// When the `std_out_file`/`std_err_file` labels are missing but
/// `job_dir` is present, the paths are synthesized as
/// `{job_dir}/{job}.out` and `{job_dir}/{job}.err`.
pub fn parse_report(job_name: &str, text: &str) -> JobReport {
    let status_re = Regex::new(r"Status/Event:\s+(\w+)").unwrap();
    let last_run_re = Regex::new(r"Last Run:\s+([\d/]+\s+[\d:]+)").unwrap();

    let mut report = JobReport {
        job_name: job_name.to_string(),
        status: first_capture(&status_re, text),
        last_run: first_capture(&last_run_re, text),
        std_out_file: labeled_value("std_out_file", text),
        std_err_file: labeled_value("std_err_file", text),
        job_dir: labeled_value("job_dir", text),
        metadata: BTreeMap::new(),
    };

    if report.std_out_file.is_none() || report.std_err_file.is_none() {
        if let Some(ref dir) = report.job_dir {
            if report.std_out_file.is_none() {
                report.std_out_file = Some(join_log_path(dir, job_name, "out"));
            }
            if report.std_err_file.is_none() {
                report.std_err_file = Some(join_log_path(dir, job_name, "err"));
            }
        }
    }

    for attr in METADATA_ATTRIBUTES {
        if let Some(value) = labeled_value(attr, text) {
            report.metadata.insert((*attr).to_string(), value);
        }
    }

    report
}

/// Extract `label: value` where the value runs to the next whitespace
/// or end of text. An empty value counts as absent.
fn labeled_value(label: &str, text: &str) -> Option<String> {
    let re = Regex::new(&format!(r"{}:\s*(.*?)(?:\s+|$)", label)).unwrap();
    re.captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].trim().to_string())
}

fn join_log_path(dir: &str, job_name: &str, ext: &str) -> String {
    Path::new(dir)
        .join(format!("{}.{}", job_name, ext))
        .display()
        .to_string()
}
