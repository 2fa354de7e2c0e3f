//! JSON shapes exchanged with the analysis service.

use chrono::{DateTime, Utc};
use dashboard_core::{BrokenLink, HeadingCounts, Job, JobId, JobPage, JobStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireStatus {
    Queued,
    Running,
    Completed,
    Error,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireHeadingCounts {
    h1: u32,
    h2: u32,
    h3: u32,
    h4: u32,
    h5: u32,
    h6: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBrokenLink {
    url: String,
    #[serde(default)]
    status_code: u16,
    #[serde(default)]
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireJob {
    id: String,
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_version: String,
    #[serde(default)]
    heading_counts: Option<WireHeadingCounts>,
    #[serde(default)]
    internal_links: u32,
    #[serde(default)]
    external_links: u32,
    #[serde(default)]
    broken_links: Option<Vec<WireBrokenLink>>,
    #[serde(default)]
    has_login_form: bool,
    status: WireStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireListResponse {
    #[serde(default)]
    results: Option<Vec<WireJob>>,
    total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    pub(crate) error: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRequest<'a> {
    pub(crate) url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct IdsRequest<'a> {
    pub(crate) ids: &'a [JobId],
}

impl From<WireStatus> for JobStatus {
    fn from(status: WireStatus) -> Self {
        match status {
            WireStatus::Queued => JobStatus::Queued,
            WireStatus::Running => JobStatus::Running,
            WireStatus::Completed => JobStatus::Completed,
            WireStatus::Error => JobStatus::Error,
        }
    }
}

impl From<WireJob> for Job {
    fn from(wire: WireJob) -> Self {
        let counts = wire.heading_counts.unwrap_or_default();
        let status = JobStatus::from(wire.status);
        Job {
            id: wire.id,
            url: wire.url,
            title: wire.title,
            html_version: wire.html_version,
            heading_counts: HeadingCounts {
                h1: counts.h1,
                h2: counts.h2,
                h3: counts.h3,
                h4: counts.h4,
                h5: counts.h5,
                h6: counts.h6,
            },
            internal_links: wire.internal_links,
            external_links: wire.external_links,
            broken_links: wire
                .broken_links
                .unwrap_or_default()
                .into_iter()
                .map(|link| BrokenLink {
                    url: link.url,
                    status_code: link.status_code,
                    error: link.error,
                })
                .collect(),
            has_login_form: wire.has_login_form,
            status,
            created_at: wire.created_at,
            completed_at: wire.completed_at.filter(|_| status.is_terminal()),
            // The service sends an empty string or omits it when there is no error.
            error: wire
                .error
                .filter(|message| status == JobStatus::Error && !message.is_empty()),
        }
    }
}

impl From<WireListResponse> for JobPage {
    fn from(wire: WireListResponse) -> Self {
        JobPage {
            results: wire
                .results
                .unwrap_or_default()
                .into_iter()
                .map(Job::from)
                .collect(),
            total: wire.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_created_job() {
        let wire: WireJob = serde_json::from_str(
            r#"{"id":"abc","url":"https://a.test","title":"","htmlVersion":"",
                "headingCounts":{},"internalLinks":0,"externalLinks":0,
                "brokenLinks":null,"hasLoginForm":false,"status":"queued",
                "createdAt":"2024-01-15T10:30:00Z","completedAt":null}"#,
        )
        .unwrap();
        let job = Job::from(wire);

        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.heading_counts, HeadingCounts::default());
        assert!(job.broken_links.is_empty());
        assert_eq!(job.completed_at, None);
        assert_eq!(job.error, None);
    }

    #[test]
    fn keeps_error_message_only_for_failed_jobs() {
        let wire: WireJob = serde_json::from_str(
            r#"{"id":"e","url":"https://e.test","status":"error",
                "createdAt":"2024-01-15T10:30:00Z",
                "completedAt":"2024-01-15T10:31:00+02:00","error":"dns failure"}"#,
        )
        .unwrap();
        let job = Job::from(wire);

        assert_eq!(job.error.as_deref(), Some("dns failure"));
        assert_eq!(
            job.completed_at.map(|at| at.to_rfc3339()),
            Some("2024-01-15T08:31:00+00:00".to_string())
        );
    }

    #[test]
    fn drops_completion_time_of_unfinished_jobs() {
        let wire: WireJob = serde_json::from_str(
            r#"{"id":"r","url":"https://r.test","status":"running",
                "createdAt":"2024-01-15T10:30:00Z",
                "completedAt":"2024-01-15T10:31:00Z","error":"previous run failed"}"#,
        )
        .unwrap();
        let job = Job::from(wire);

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.completed_at, None);
        assert_eq!(job.error, None);
    }

    #[test]
    fn rejects_unknown_status() {
        let result: Result<WireJob, _> = serde_json::from_str(
            r#"{"id":"x","url":"https://x.test","status":"paused","createdAt":"2024-01-15T10:30:00Z"}"#,
        );
        assert!(result.is_err());
    }
}
