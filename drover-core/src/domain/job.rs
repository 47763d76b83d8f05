//! Job status domain types

use serde::{Deserialize, Serialize};

/// Per-node state the service reports as completed.
pub const STATE_FINISHED: &str = "finished";

/// Status report for a job, as returned by `GET orchestrator/v1/jobs/{id}`
///
/// The service reports one entry per node (or subjob) the job fanned out
/// to. Entries arrive in service order; unknown extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: Vec<StatusEntry>,
}

/// One node/subjob's reported state within a job's status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Enum-like state string ("running", "finished", "failed", ...).
    /// Kept as a string: the service may report states this client does
    /// not know about, and they must survive a round trip.
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl StatusEntry {
    pub fn is_finished(&self) -> bool {
        self.state == STATE_FINISHED
    }
}

impl JobStatusReport {
    /// True if at least one entry reports "finished".
    pub fn any_finished(&self) -> bool {
        self.status.iter().any(StatusEntry::is_finished)
    }

    /// True if the report is non-empty and every entry reports "finished".
    ///
    /// An empty report is not considered finished; the service has not
    /// told us anything about the job yet.
    pub fn all_finished(&self) -> bool {
        !self.status.is_empty() && self.status.iter().all(StatusEntry::is_finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(state: &str) -> StatusEntry {
        StatusEntry {
            state: state.to_string(),
            enter_time: None,
            exit_time: None,
        }
    }

    #[test]
    fn any_finished_matches_single_entry() {
        let report = JobStatusReport {
            status: vec![entry("running"), entry("finished")],
        };
        assert!(report.any_finished());
        assert!(!report.all_finished());
    }

    #[test]
    fn all_finished_requires_every_entry() {
        let report = JobStatusReport {
            status: vec![entry("finished"), entry("finished")],
        };
        assert!(report.all_finished());
    }

    #[test]
    fn empty_report_is_not_finished() {
        let report = JobStatusReport { status: vec![] };
        assert!(!report.any_finished());
        assert!(!report.all_finished());
    }

    #[test]
    fn decodes_service_body_and_ignores_extra_fields() {
        let body = r#"{"status":[{"state":"running","node":"web01.example"},{"state":"finished"}]}"#;
        let report: JobStatusReport = serde_json::from_str(body).unwrap();
        assert_eq!(report.status.len(), 2);
        assert!(report.any_finished());
    }
}
