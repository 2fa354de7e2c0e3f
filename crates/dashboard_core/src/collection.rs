use std::collections::BTreeSet;

use dashboard_logging::dash_debug;

use crate::{Job, JobId, JobStatus};

/// One page as returned by the service's listing call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPage {
    pub results: Vec<Job>,
    pub total: u64,
}

/// The locally materialised page of jobs plus the total matching the query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobCollection {
    items: Vec<Job>,
    total_matching: u64,
}

impl JobCollection {
    pub fn items(&self) -> &[Job] {
        &self.items
    }

    pub fn total_matching(&self) -> u64 {
        self.total_matching
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.items.iter().find(|job| job.id == id)
    }

    /// Replaces the page wholesale with the server's copy.
    ///
    /// A job that is already held locally in a more advanced state keeps the
    /// local copy: the incoming report is older than what was observed.
    /// Returns how many such stale reports were rejected.
    pub(crate) fn replace(&mut self, page: JobPage) -> usize {
        let mut rejected = 0;
        let items = page
            .results
            .into_iter()
            .map(|incoming| match self.get(&incoming.id) {
                Some(local) if !local.status.accepts(incoming.status) => {
                    dash_debug!(
                        "Keeping job {} as {} over stale report {}",
                        local.id,
                        local.status,
                        incoming.status
                    );
                    rejected += 1;
                    local.clone()
                }
                _ => incoming,
            })
            .collect();
        self.items = items;
        self.total_matching = page.total;
        rejected
    }

    /// Applies a single authoritative job under the forward-only rule.
    ///
    /// Jobs not on the current page are ignored. Returns whether the local
    /// copy changed.
    pub(crate) fn reconcile(&mut self, incoming: &Job) -> bool {
        let Some(local) = self.items.iter_mut().find(|job| job.id == incoming.id) else {
            return false;
        };
        if !local.status.accepts(incoming.status) || *local == *incoming {
            return false;
        }
        *local = incoming.clone();
        true
    }

    /// Optimistic insert of a newly created job at the top of the page.
    ///
    /// The page may briefly hold one more item than the page size, and the
    /// total is left alone since the job may not match the search; the next
    /// refresh restores both.
    pub(crate) fn prepend(&mut self, job: Job) {
        self.items.insert(0, job);
    }

    pub(crate) fn mark_running(&mut self, ids: &BTreeSet<JobId>) -> usize {
        let mut changed = 0;
        for job in self.items.iter_mut().filter(|job| ids.contains(&job.id)) {
            if job.status != JobStatus::Running {
                changed += 1;
            }
            job.mark_running();
        }
        changed
    }

    /// Drops the listed jobs from the page and shrinks the total by the
    /// number actually removed.
    pub(crate) fn remove(&mut self, ids: &BTreeSet<JobId>) -> usize {
        let before = self.items.len();
        self.items.retain(|job| !ids.contains(&job.id));
        let removed = before - self.items.len();
        self.total_matching = self.total_matching.saturating_sub(removed as u64);
        removed
    }
}
