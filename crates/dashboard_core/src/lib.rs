//! Dashboard core: pure state machine for the job list, selection and query.
mod collection;
mod dispatcher;
mod effect;
mod error;
mod job;
mod lifecycle;
mod msg;
mod query;
mod selection;
mod state;
mod update;
mod view_model;

pub use collection::{JobCollection, JobPage};
pub use dispatcher::{CommandDispatcher, Operation};
pub use effect::Effect;
pub use error::{CommandError, ServiceError, ValidationError};
pub use job::{BrokenLink, HeadingCounts, Job, JobId};
pub use lifecycle::JobStatus;
pub use msg::Msg;
pub use query::{QueryState, RefreshTicket, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use selection::SelectionSet;
pub use state::{AppState, Notice};
pub use update::update;
pub use view_model::{AppViewModel, JobDetailsView, JobRowView};
