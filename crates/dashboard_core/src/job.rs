use chrono::{DateTime, Utc};

use crate::JobStatus;

/// Server-assigned opaque job identifier.
pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

impl HeadingCounts {
    /// Counts paired with their level name, `h1` first.
    pub fn levels(&self) -> [(&'static str, u32); 6] {
        [
            ("h1", self.h1),
            ("h2", self.h2),
            ("h3", self.h3),
            ("h4", self.h4),
            ("h5", self.h5),
            ("h6", self.h6),
        ]
    }

    pub fn total(&self) -> u32 {
        self.levels().iter().map(|(_, count)| count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub url: String,
    pub status_code: u16,
    pub error: String,
}

/// One submitted URL and everything the analysis service reported about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub url: String,
    pub title: String,
    pub html_version: String,
    pub heading_counts: HeadingCounts,
    pub internal_links: u32,
    pub external_links: u32,
    pub broken_links: Vec<BrokenLink>,
    pub has_login_form: bool,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Job {
    /// A freshly created job: queued, no analysis results yet.
    pub fn queued(id: impl Into<JobId>, url: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: String::new(),
            html_version: String::new(),
            heading_counts: HeadingCounts::default(),
            internal_links: 0,
            external_links: 0,
            broken_links: Vec::new(),
            has_login_form: false,
            status: JobStatus::Queued,
            created_at,
            completed_at: None,
            error: None,
        }
    }

    pub fn total_links(&self) -> u64 {
        u64::from(self.internal_links) + u64::from(self.external_links)
    }

    /// Internal and external links as percentages of all links.
    ///
    /// A job without links reports `(0.0, 0.0)`.
    pub fn link_shares(&self) -> (f64, f64) {
        let total = self.total_links();
        if total == 0 {
            return (0.0, 0.0);
        }
        let total = total as f64;
        (
            f64::from(self.internal_links) / total * 100.0,
            f64::from(self.external_links) / total * 100.0,
        )
    }

    /// Client-side transition issued after the service accepted a start
    /// request for this job.
    pub(crate) fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.completed_at = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(internal: u32, external: u32) -> Job {
        let mut job = Job::queued("1", "https://a.test", DateTime::<Utc>::UNIX_EPOCH);
        job.internal_links = internal;
        job.external_links = external;
        job
    }

    #[test]
    fn link_shares_without_links_are_zero() {
        assert_eq!(job(0, 0).link_shares(), (0.0, 0.0));
    }

    #[test]
    fn link_shares_split_total() {
        let (internal, external) = job(3, 1).link_shares();
        assert!((internal - 75.0).abs() < f64::EPSILON);
        assert!((external - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heading_total_sums_levels() {
        let counts = HeadingCounts {
            h1: 1,
            h2: 2,
            h3: 3,
            ..HeadingCounts::default()
        };
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.levels()[2], ("h3", 3));
    }

    #[test]
    fn mark_running_clears_terminal_fields() {
        let mut job = job(0, 0);
        job.status = JobStatus::Error;
        job.completed_at = Some(DateTime::<Utc>::UNIX_EPOCH);
        job.error = Some("boom".into());

        job.mark_running();

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.completed_at, None);
        assert_eq!(job.error, None);
    }
}
