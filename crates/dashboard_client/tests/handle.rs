use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashboard_client::{
    AnalysisService, ChannelEventSink, HttpAnalysisService, ServiceCommand, ServiceEvent,
    ServiceHandle, ServiceSettings,
};
use dashboard_core::{
    update, AppState, Effect, Job, JobId, JobPage, JobStatus, Msg, QueryState, ServiceError,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// In-memory service whose listing answers slowly for the search term "slow".
#[derive(Default)]
struct FakeService {
    started: Mutex<Vec<JobId>>,
}

#[async_trait::async_trait]
impl AnalysisService for FakeService {
    async fn list(&self, query: &QueryState) -> Result<JobPage, ServiceError> {
        if query.search_term() == "slow" {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        let id = format!("{}-hit", query.search_term());
        Ok(JobPage {
            results: vec![Job::queued(id, "https://a.test", DateTime::<Utc>::UNIX_EPOCH)],
            total: 1,
        })
    }

    async fn create(&self, url: &str) -> Result<Job, ServiceError> {
        Ok(Job::queued("created", url, Utc::now()))
    }

    async fn start_batch(&self, ids: &[JobId]) -> Result<(), ServiceError> {
        self.started.lock().unwrap().extend_from_slice(ids);
        Ok(())
    }

    async fn delete_batch(&self, _ids: &[JobId]) -> Result<(), ServiceError> {
        Err(ServiceError::Transport("read only".into()))
    }

    async fn get_one(&self, id: &str) -> Result<Job, ServiceError> {
        Err(ServiceError::NotFound(id.to_string()))
    }

    async fn health(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

fn spawn(service: Arc<dyn AnalysisService>) -> (ServiceHandle, mpsc::Receiver<ServiceEvent>) {
    let (tx, rx) = mpsc::channel();
    let handle = ServiceHandle::new(service, Arc::new(ChannelEventSink::new(tx))).expect("handle");
    (handle, rx)
}

/// What the app's effect runner does, minus the threads.
fn run_effects(handle: &ServiceHandle, effects: Vec<Effect>) {
    for effect in effects {
        let command = match effect {
            Effect::FetchPage(ticket) => ServiceCommand::List(ticket),
            Effect::CreateJob { url } => ServiceCommand::Create { url },
            Effect::StartJobs { ids } => ServiceCommand::Start { ids },
            Effect::DeleteJobs { ids } => ServiceCommand::Delete { ids },
            Effect::FetchJob { id } => ServiceCommand::Get { id },
        };
        handle.submit(command);
    }
}

fn to_msg(event: ServiceEvent) -> Msg {
    match event {
        ServiceEvent::Listed { ticket, result } => Msg::PageLoaded { ticket, result },
        ServiceEvent::Created(result) => Msg::JobCreated(result),
        ServiceEvent::Started { ids, result } => Msg::StartFinished { ids, result },
        ServiceEvent::Deleted { ids, result } => Msg::DeleteFinished { ids, result },
        ServiceEvent::Fetched { id, result } => Msg::DetailsLoaded { id, result },
        ServiceEvent::HealthChecked(_) => Msg::NoOp,
    }
}

fn step(
    handle: &ServiceHandle,
    rx: &mpsc::Receiver<ServiceEvent>,
    state: AppState,
    msg: Msg,
) -> AppState {
    let (state, effects) = update(state, msg);
    let pending = effects.len();
    run_effects(handle, effects);
    (0..pending).fold(state, |state, _| {
        let event = rx.recv_timeout(EVENT_TIMEOUT).expect("service event");
        update(state, to_msg(event)).0
    })
}

#[test]
fn out_of_order_pages_keep_latest_query() {
    let (handle, rx) = spawn(Arc::new(FakeService::default()));

    let (state, first) = update(AppState::new(), Msg::SearchChanged("slow".into()));
    run_effects(&handle, first);
    let (mut state, second) = update(state, Msg::SearchChanged("fast".into()));
    run_effects(&handle, second);

    let mut arrival = Vec::new();
    for _ in 0..2 {
        let event = rx.recv_timeout(EVENT_TIMEOUT).expect("service event");
        if let ServiceEvent::Listed { ticket, .. } = &event {
            arrival.push(ticket.query.search_term().to_string());
        }
        state = update(state, to_msg(event)).0;
    }

    assert_eq!(arrival, vec!["fast", "slow"]);
    let ids: Vec<_> = state
        .collection()
        .items()
        .iter()
        .map(|job| job.id.as_str())
        .collect();
    assert_eq!(ids, vec!["fast-hit"]);
    assert!(!state.is_loading());
}

#[test]
fn health_and_fetch_events_come_back() {
    let (handle, rx) = spawn(Arc::new(FakeService::default()));

    handle.submit(ServiceCommand::Health);
    assert_eq!(
        rx.recv_timeout(EVENT_TIMEOUT).expect("event"),
        ServiceEvent::HealthChecked(Ok(()))
    );

    handle.submit(ServiceCommand::Get { id: "nope".into() });
    assert_eq!(
        rx.recv_timeout(EVENT_TIMEOUT).expect("event"),
        ServiceEvent::Fetched {
            id: "nope".into(),
            result: Err(ServiceError::NotFound("nope".into())),
        }
    );
}

#[test]
fn start_and_failed_delete_through_handle() {
    let service = Arc::new(FakeService::default());
    let (handle, rx) = spawn(service.clone());

    let state = step(&handle, &rx, AppState::new(), Msg::SearchChanged("a".into()));
    let state = step(&handle, &rx, state, Msg::SelectAllToggled(true));
    let state = step(&handle, &rx, state, Msg::DeleteClicked);
    assert!(state.selection().contains("a-hit"));
    assert!(state.notice().is_some());

    let state = step(&handle, &rx, state, Msg::StartClicked);
    assert_eq!(*service.started.lock().unwrap(), vec!["a-hit".to_string()]);
    assert_eq!(
        state.collection().get("a-hit").map(|job| job.status),
        Some(JobStatus::Running)
    );
    assert!(state.selection().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn select_and_start_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl-results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": "1",
                "url": "https://example.com",
                "status": "queued",
                "createdAt": "2024-01-15T10:30:00Z"
            }],
            "total": 1,
            "page": 1,
            "limit": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/crawl-results/start-crawling"))
        .and(body_json(json!({ "ids": ["1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpAnalysisService::new(&ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    })
    .expect("client");
    let (handle, rx) = spawn(Arc::new(service));

    let state = step(&handle, &rx, AppState::new(), Msg::RefreshClicked);
    assert_eq!(
        state.collection().get("1").map(|job| job.status),
        Some(JobStatus::Queued)
    );
    assert!(state.selection().is_empty());

    let state = step(
        &handle,
        &rx,
        state,
        Msg::RowToggled {
            id: "1".into(),
            included: true,
        },
    );
    assert!(state.selection().contains("1"));

    let state = step(&handle, &rx, state, Msg::StartClicked);
    assert_eq!(
        state.collection().get("1").map(|job| job.status),
        Some(JobStatus::Running)
    );
    assert!(state.selection().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_start_over_http_keeps_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl-results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": "x", "url": "https://x.test", "status": "queued", "createdAt": "2024-01-15T10:30:00Z" },
                { "id": "y", "url": "https://y.test", "status": "queued", "createdAt": "2024-01-15T10:30:00Z" }
            ],
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/crawl-results/start-crawling"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Failed to start crawling" })),
        )
        .mount(&server)
        .await;

    let service = HttpAnalysisService::new(&ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    })
    .expect("client");
    let (handle, rx) = spawn(Arc::new(service));

    let state = step(&handle, &rx, AppState::new(), Msg::RefreshClicked);
    let state = step(&handle, &rx, state, Msg::SelectAllToggled(true));
    let state = step(&handle, &rx, state, Msg::StartClicked);

    let selected: Vec<_> = state.selection().ids().iter().cloned().collect();
    assert_eq!(selected, vec!["x", "y"]);
    assert!(state
        .collection()
        .items()
        .iter()
        .all(|job| job.status == JobStatus::Queued));
    let notice = state.view().notice.expect("notice");
    assert!(notice.contains("Failed to start crawling"), "{notice}");
}
