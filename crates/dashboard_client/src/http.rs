use dashboard_core::{Job, JobId, JobPage, QueryState, ServiceError};
use dashboard_logging::dash_debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::wire::{CreateRequest, IdsRequest, WireErrorBody, WireJob, WireListResponse};
use crate::{AnalysisService, ClientError, ServiceSettings};

const RESULTS_PATH: [&str; 2] = ["api", "crawl-results"];

/// [`AnalysisService`] over the service's JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpAnalysisService {
    pub fn new(settings: &ServiceSettings) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(&settings.base_url).map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) url".to_string()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn results_endpoint(&self, extra: &[&str]) -> Url {
        let segments: Vec<&str> = RESULTS_PATH.iter().chain(extra).copied().collect();
        self.endpoint(&segments)
    }

    fn post_json<T: Serialize>(&self, url: Url, body: &T) -> Result<RequestBuilder, ServiceError> {
        let body = serde_json::to_vec(body)
            .map_err(|err| ServiceError::Transport(format!("failed to encode request: {err}")))?;
        Ok(self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body))
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn list(&self, query: &QueryState) -> Result<JobPage, ServiceError> {
        let mut url = self.results_endpoint(&[]);
        url.query_pairs_mut()
            .append_pair("page", &query.page().to_string())
            .append_pair("limit", &query.page_size().to_string())
            .append_pair("search", query.search_term());
        dash_debug!("GET {}", url);

        let response = send(self.client.get(url)).await?;
        let wire: WireListResponse = decode(response).await?;
        Ok(JobPage::from(wire))
    }

    async fn create(&self, url: &str) -> Result<Job, ServiceError> {
        let request = self.post_json(self.results_endpoint(&[]), &CreateRequest { url })?;
        let response = send(request).await?;
        let wire: WireJob = decode(response).await?;
        Ok(Job::from(wire))
    }

    async fn start_batch(&self, ids: &[JobId]) -> Result<(), ServiceError> {
        let request = self.post_json(
            self.results_endpoint(&["start-crawling"]),
            &IdsRequest { ids },
        )?;
        send(request).await?;
        Ok(())
    }

    async fn delete_batch(&self, ids: &[JobId]) -> Result<(), ServiceError> {
        let request = self.post_json(self.results_endpoint(&["bulk-delete"]), &IdsRequest { ids })?;
        send(request).await?;
        Ok(())
    }

    async fn get_one(&self, id: &str) -> Result<Job, ServiceError> {
        let url = self.results_endpoint(&[id]);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        let response = check_status(response).await?;
        let wire: WireJob = decode(response).await?;
        Ok(Job::from(wire))
    }

    async fn health(&self) -> Result<(), ServiceError> {
        send(self.client.get(self.endpoint(&["health"]))).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ServiceError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    check_status(response).await
}

async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // The service reports failures as `{"error": "..."}`.
    let detail = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<WireErrorBody>(&body).ok())
        .map(|body| body.error);
    Err(ServiceError::Transport(match detail {
        Some(detail) => format!("{status}: {detail}"),
        None => status.to_string(),
    }))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ServiceError::Transport(format!("invalid response body: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Transport(format!("timeout: {err}"));
    }
    if err.is_connect() {
        return ServiceError::Transport(format!("connection failed: {err}"));
    }
    ServiceError::Transport(err.to_string())
}
