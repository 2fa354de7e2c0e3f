use dashboard_core::{Job, JobId, JobPage, QueryState, ServiceError};

/// The remote analysis service as seen by the dashboard.
///
/// Batch calls are all-or-nothing: one success or failure per request.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn list(&self, query: &QueryState) -> Result<JobPage, ServiceError>;

    /// Creates a job for `url`; the service returns it queued.
    async fn create(&self, url: &str) -> Result<Job, ServiceError>;

    async fn start_batch(&self, ids: &[JobId]) -> Result<(), ServiceError>;

    async fn delete_batch(&self, ids: &[JobId]) -> Result<(), ServiceError>;

    async fn get_one(&self, id: &str) -> Result<Job, ServiceError>;

    async fn health(&self) -> Result<(), ServiceError>;
}
