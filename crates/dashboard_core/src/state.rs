use dashboard_logging::{dash_debug, dash_warn};

use crate::view_model::AppViewModel;
use crate::{
    CommandDispatcher, CommandError, Effect, Job, JobCollection, JobId, JobPage, Operation,
    QueryState, RefreshTicket, SelectionSet, ServiceError,
};

/// An error surfaced to the operator, shown until dismissed or until the
/// same operation next succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub error: CommandError,
}

/// The coordinator's state: query, page, selection and in-flight commands.
///
/// Only `update` mutates it; everything the presentation needs is read
/// through [`AppState::view`] or the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) query: QueryState,
    pub(crate) collection: JobCollection,
    pub(crate) selection: SelectionSet,
    pub(crate) dispatcher: CommandDispatcher,
    last_seq: u64,
    pending_refresh: Option<RefreshTicket>,
    details: Option<Job>,
    details_requested: Option<JobId>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `query` instead of the default first page.
    pub fn with_query(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn collection(&self) -> &JobCollection {
        &self.collection
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn details(&self) -> Option<&Job> {
        self.details.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// True while the latest refresh has not answered yet.
    pub fn is_loading(&self) -> bool {
        self.pending_refresh.is_some()
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn issue_refresh(&mut self) -> Effect {
        self.last_seq += 1;
        let ticket = RefreshTicket {
            seq: self.last_seq,
            query: self.query.clone(),
        };
        self.pending_refresh = Some(ticket.clone());
        self.mark_dirty();
        Effect::FetchPage(ticket)
    }

    /// Reissues a pending refresh after a local change, so a listing taken
    /// before that change is discarded by sequence number.
    pub(crate) fn supersede_pending_refresh(&mut self) -> Option<Effect> {
        let pending = self.pending_refresh.as_ref()?;
        dash_debug!("Superseding refresh seq={} after local change", pending.seq);
        Some(self.issue_refresh())
    }

    /// Switches to `query` and issues the one refresh that change requires.
    pub(crate) fn set_query(&mut self, query: QueryState) -> Effect {
        self.query = query;
        self.issue_refresh()
    }

    fn is_current(&self, ticket: &RefreshTicket) -> bool {
        self.pending_refresh.is_some() && ticket.seq == self.last_seq && ticket.query == self.query
    }

    pub(crate) fn apply_page(&mut self, ticket: RefreshTicket, result: Result<JobPage, ServiceError>) {
        if !self.is_current(&ticket) {
            dash_debug!(
                "Discarding stale page response seq={} (latest seq={})",
                ticket.seq,
                self.last_seq
            );
            return;
        }
        self.pending_refresh = None;
        self.mark_dirty();
        match result {
            Ok(page) => {
                self.collection.replace(page);
                self.sync_details();
                self.clear_notice(Operation::Refresh);
                self.clear_notice(Operation::ChangeQuery);
            }
            Err(err) => self.report(Operation::Refresh, err.into()),
        }
    }

    pub(crate) fn request_details(&mut self, id: JobId) -> Effect {
        self.details_requested = Some(id.clone());
        self.mark_dirty();
        Effect::FetchJob { id }
    }

    pub(crate) fn apply_details(&mut self, id: JobId, result: Result<Job, ServiceError>) {
        if self.details_requested.as_ref() != Some(&id) {
            dash_debug!("Discarding details response for {}", id);
            return;
        }
        self.details_requested = None;
        self.mark_dirty();
        match result {
            Ok(job) => {
                self.collection.reconcile(&job);
                self.details = Some(self.collection.get(&id).cloned().unwrap_or(job));
                self.clear_notice(Operation::LoadDetails);
            }
            Err(err) => self.report(Operation::LoadDetails, err.into()),
        }
    }

    pub(crate) fn close_details(&mut self) {
        self.details = None;
        self.details_requested = None;
        self.mark_dirty();
    }

    pub(crate) fn is_showing_details_of(&self, ids: &[JobId]) -> bool {
        self.details
            .as_ref()
            .is_some_and(|job| ids.contains(&job.id))
    }

    /// Keeps the details panel in step with the page after local changes.
    pub(crate) fn sync_details(&mut self) {
        if let Some(details) = self.details.as_mut() {
            if let Some(job) = self.collection.get(&details.id) {
                *details = job.clone();
            }
        }
    }

    pub(crate) fn report(&mut self, operation: Operation, error: CommandError) {
        dash_warn!("{:?} failed: {}", operation, error);
        self.notice = Some(Notice { operation, error });
        self.mark_dirty();
    }

    pub(crate) fn clear_notice(&mut self, operation: Operation) {
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| notice.operation == operation)
        {
            self.notice = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }
}
