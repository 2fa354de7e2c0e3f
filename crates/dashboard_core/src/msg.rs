use crate::{Job, JobId, JobPage, RefreshTicket, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search box.
    SearchChanged(String),
    /// User navigated to another page.
    PageChanged(u32),
    /// User picked another page size.
    PageSizeChanged(u32),
    /// User asked to reload the current page.
    RefreshClicked,
    /// User submitted the add-URL form.
    UrlSubmitted(String),
    /// User ticked or unticked a single row.
    RowToggled { id: JobId, included: bool },
    /// User ticked or unticked the "select all" checkbox.
    SelectAllToggled(bool),
    StartClicked,
    DeleteClicked,
    /// User opened the details panel for a job.
    DetailsRequested(JobId),
    DetailsClosed,
    ErrorDismissed,
    /// Listing response for the refresh identified by `ticket`.
    PageLoaded {
        ticket: RefreshTicket,
        result: Result<JobPage, ServiceError>,
    },
    JobCreated(Result<Job, ServiceError>),
    StartFinished {
        ids: Vec<JobId>,
        result: Result<(), ServiceError>,
    },
    DeleteFinished {
        ids: Vec<JobId>,
        result: Result<(), ServiceError>,
    },
    DetailsLoaded {
        id: JobId,
        result: Result<Job, ServiceError>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
