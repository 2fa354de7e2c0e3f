use chrono::{DateTime, Utc};

use crate::{AppState, BrokenLink, Job, JobId, JobStatus, Operation};

/// Everything the presentation needs for one render. Rebuilt on every call
/// to [`AppState::view`]; nothing here is cached between renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub rows: Vec<JobRowView>,
    pub total_matching: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub search_term: String,
    pub selected_count: usize,
    pub all_selected: bool,
    pub loading: bool,
    pub add_enabled: bool,
    pub start_enabled: bool,
    pub delete_enabled: bool,
    pub details: Option<JobDetailsView>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: JobId,
    pub url: String,
    pub title: String,
    pub html_version: String,
    pub internal_links: u32,
    pub external_links: u32,
    pub broken_links: usize,
    pub status: JobStatus,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDetailsView {
    pub id: JobId,
    pub url: String,
    pub title: String,
    pub html_version: String,
    pub status: JobStatus,
    pub internal_links: u32,
    pub external_links: u32,
    pub internal_share: f64,
    pub external_share: f64,
    pub headings: [(&'static str, u32); 6],
    pub broken_links: Vec<BrokenLink>,
    pub has_login_form: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let query = state.query();
        let collection = state.collection();
        let selection = state.selection();
        let dispatcher = state.dispatcher();
        let total_pages = query.total_pages(collection.total_matching());
        let has_selection = !selection.is_empty();

        Self {
            rows: collection
                .items()
                .iter()
                .map(|job| JobRowView::new(job, selection.contains(&job.id)))
                .collect(),
            total_matching: collection.total_matching(),
            page: query.page(),
            page_size: query.page_size(),
            total_pages,
            has_prev: query.page() > 1,
            has_next: u64::from(query.page()) < total_pages,
            search_term: query.search_term().to_owned(),
            selected_count: selection.len(),
            all_selected: selection.all_selected(collection.items()),
            loading: state.is_loading(),
            add_enabled: !dispatcher.in_flight(Operation::AddJob),
            start_enabled: has_selection && !dispatcher.in_flight(Operation::StartCrawling),
            delete_enabled: has_selection && !dispatcher.in_flight(Operation::DeleteJobs),
            details: state.details().map(JobDetailsView::new),
            notice: state.notice().map(|notice| notice.error.to_string()),
        }
    }
}

impl JobRowView {
    fn new(job: &Job, selected: bool) -> Self {
        Self {
            id: job.id.clone(),
            url: job.url.clone(),
            title: display_or(&job.title, "No title"),
            html_version: display_or(&job.html_version, "N/A"),
            internal_links: job.internal_links,
            external_links: job.external_links,
            broken_links: job.broken_links.len(),
            status: job.status,
            selected,
        }
    }
}

impl JobDetailsView {
    fn new(job: &Job) -> Self {
        let (internal_share, external_share) = job.link_shares();
        Self {
            id: job.id.clone(),
            url: job.url.clone(),
            title: display_or(&job.title, "No title"),
            html_version: display_or(&job.html_version, "N/A"),
            status: job.status,
            internal_links: job.internal_links,
            external_links: job.external_links,
            internal_share,
            external_share,
            headings: job.heading_counts.levels(),
            broken_links: job.broken_links.clone(),
            has_login_form: job.has_login_form,
            created_at: job.created_at,
            completed_at: job.completed_at,
            error: job.error.clone(),
        }
    }
}

fn display_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_owned()
    } else {
        value.to_owned()
    }
}
