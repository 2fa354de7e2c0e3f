use std::collections::BTreeSet;

use dashboard_logging::dash_info;

use crate::{Effect, Job, JobCollection, JobId, SelectionSet, ServiceError, ValidationError};

/// Classes of operation, used to report errors and gate duplicate requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Refresh,
    ChangeQuery,
    AddJob,
    StartCrawling,
    DeleteJobs,
    LoadDetails,
}

/// Issues add/start/delete commands and reconciles their outcomes.
///
/// Batches are all-or-nothing: the service reports one success or failure
/// per request, so a failure leaves the page and the selection exactly as
/// they were and the same selection can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandDispatcher {
    adding: bool,
    starting: bool,
    deleting: bool,
}

impl CommandDispatcher {
    pub fn in_flight(&self, operation: Operation) -> bool {
        match operation {
            Operation::AddJob => self.adding,
            Operation::StartCrawling => self.starting,
            Operation::DeleteJobs => self.deleting,
            Operation::Refresh | Operation::ChangeQuery | Operation::LoadDetails => false,
        }
    }

    /// `Ok(None)` means an add is already in flight and the submit is ignored.
    pub(crate) fn add_job(&mut self, raw_url: &str) -> Result<Option<Effect>, ValidationError> {
        if self.adding {
            return Ok(None);
        }
        let url = raw_url.trim();
        if url.is_empty() {
            return Err(ValidationError::BlankUrl);
        }
        self.adding = true;
        Ok(Some(Effect::CreateJob {
            url: url.to_owned(),
        }))
    }

    pub(crate) fn start_crawling(
        &mut self,
        selection: &SelectionSet,
    ) -> Result<Option<Effect>, ValidationError> {
        if self.starting {
            return Ok(None);
        }
        let ids = batch_ids(selection)?;
        self.starting = true;
        Ok(Some(Effect::StartJobs { ids }))
    }

    pub(crate) fn delete_jobs(
        &mut self,
        selection: &SelectionSet,
    ) -> Result<Option<Effect>, ValidationError> {
        if self.deleting {
            return Ok(None);
        }
        let ids = batch_ids(selection)?;
        self.deleting = true;
        Ok(Some(Effect::DeleteJobs { ids }))
    }

    pub(crate) fn job_created(
        &mut self,
        collection: &mut JobCollection,
        result: Result<Job, ServiceError>,
    ) -> Result<(), ServiceError> {
        self.adding = false;
        let job = result?;
        dash_info!("Created job {} for {}", job.id, job.url);
        collection.prepend(job);
        Ok(())
    }

    /// Returns how many visible jobs changed state.
    pub(crate) fn start_finished(
        &mut self,
        collection: &mut JobCollection,
        selection: &mut SelectionSet,
        ids: &[JobId],
        result: Result<(), ServiceError>,
    ) -> Result<usize, ServiceError> {
        self.starting = false;
        result?;
        let ids: BTreeSet<JobId> = ids.iter().cloned().collect();
        let changed = collection.mark_running(&ids);
        selection.deselect_all();
        Ok(changed)
    }

    /// Returns how many visible jobs were removed.
    pub(crate) fn delete_finished(
        &mut self,
        collection: &mut JobCollection,
        selection: &mut SelectionSet,
        ids: &[JobId],
        result: Result<(), ServiceError>,
    ) -> Result<usize, ServiceError> {
        self.deleting = false;
        result?;
        let ids: BTreeSet<JobId> = ids.iter().cloned().collect();
        let removed = collection.remove(&ids);
        selection.deselect_all();
        Ok(removed)
    }
}

fn batch_ids(selection: &SelectionSet) -> Result<Vec<JobId>, ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    Ok(selection.ids().iter().cloned().collect())
}
