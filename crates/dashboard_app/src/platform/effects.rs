use std::sync::{mpsc, Arc};

use dashboard_client::{
    AnalysisService, ClientError, EventSink, ServiceCommand, ServiceEvent, ServiceHandle,
};
use dashboard_core::{Effect, Msg};
use dashboard_logging::{dash_info, dash_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    handle: ServiceHandle,
}

impl EffectRunner {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, ClientError> {
        let sink = Arc::new(MsgSink { event_tx });
        let handle = ServiceHandle::new(service, sink)?;
        Ok(Self { handle })
    }

    pub fn check_health(&self) {
        self.handle.submit(ServiceCommand::Health);
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::FetchPage(ticket) => dash_info!(
                    "FetchPage seq={} page={} limit={} search={:?}",
                    ticket.seq,
                    ticket.query.page(),
                    ticket.query.page_size(),
                    ticket.query.search_term()
                ),
                Effect::CreateJob { url } => dash_info!("CreateJob url={}", url),
                Effect::StartJobs { ids } => dash_info!("StartJobs count={}", ids.len()),
                Effect::DeleteJobs { ids } => dash_info!("DeleteJobs count={}", ids.len()),
                Effect::FetchJob { id } => dash_info!("FetchJob id={}", id),
            }
            self.handle.submit(command_for(effect));
        }
    }
}

/// Feeds service outcomes back into the main loop as messages.
struct MsgSink {
    event_tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: ServiceEvent) {
        let app_event = match event {
            ServiceEvent::HealthChecked(Ok(())) => {
                dash_info!("Analysis service is reachable");
                return;
            }
            ServiceEvent::HealthChecked(Err(err)) => {
                dash_warn!("Health check failed: {}", err);
                AppEvent::Warning(format!("analysis service unreachable: {err}"))
            }
            other => match msg_for(other) {
                Some(msg) => AppEvent::Service(msg),
                None => return,
            },
        };
        let _ = self.event_tx.send(app_event);
    }
}

fn command_for(effect: Effect) -> ServiceCommand {
    match effect {
        Effect::FetchPage(ticket) => ServiceCommand::List(ticket),
        Effect::CreateJob { url } => ServiceCommand::Create { url },
        Effect::StartJobs { ids } => ServiceCommand::Start { ids },
        Effect::DeleteJobs { ids } => ServiceCommand::Delete { ids },
        Effect::FetchJob { id } => ServiceCommand::Get { id },
    }
}

fn msg_for(event: ServiceEvent) -> Option<Msg> {
    match event {
        ServiceEvent::Listed { ticket, result } => Some(Msg::PageLoaded { ticket, result }),
        ServiceEvent::Created(result) => Some(Msg::JobCreated(result)),
        ServiceEvent::Started { ids, result } => Some(Msg::StartFinished { ids, result }),
        ServiceEvent::Deleted { ids, result } => Some(Msg::DeleteFinished { ids, result }),
        ServiceEvent::Fetched { id, result } => Some(Msg::DetailsLoaded { id, result }),
        ServiceEvent::HealthChecked(_) => None,
    }
}
