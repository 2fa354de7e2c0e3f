use crate::{JobId, RefreshTicket};

/// Work for the analysis service, produced by `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage(RefreshTicket),
    CreateJob { url: String },
    StartJobs { ids: Vec<JobId> },
    DeleteJobs { ids: Vec<JobId> },
    FetchJob { id: JobId },
}
