use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_core::{Job, JobId, JobPage, RefreshTicket, ServiceError};
use dashboard_logging::dash_trace;

use crate::{AnalysisService, ClientError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCommand {
    List(RefreshTicket),
    Create { url: String },
    Start { ids: Vec<JobId> },
    Delete { ids: Vec<JobId> },
    Get { id: JobId },
    Health,
}

/// Outcome of one [`ServiceCommand`], carrying back whatever the caller
/// needs to match it with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    Listed {
        ticket: RefreshTicket,
        result: Result<JobPage, ServiceError>,
    },
    Created(Result<Job, ServiceError>),
    Started {
        ids: Vec<JobId>,
        result: Result<(), ServiceError>,
    },
    Deleted {
        ids: Vec<JobId>,
        result: Result<(), ServiceError>,
    },
    Fetched {
        id: JobId,
        result: Result<Job, ServiceError>,
    },
    HealthChecked(Result<(), ServiceError>),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ServiceEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ServiceEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ServiceEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ServiceEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs service calls on a background runtime.
///
/// Every command becomes its own task, so several calls can be in flight at
/// once and may complete in any order. Dropping the handle stops the
/// runtime once the command channel closes.
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<ServiceCommand>();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(service.as_ref(), command).await;
                    sink.emit(event);
                });
            }
        });

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, command: ServiceCommand) {
        dash_trace!("Submitting {:?}", command);
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(service: &dyn AnalysisService, command: ServiceCommand) -> ServiceEvent {
    match command {
        ServiceCommand::List(ticket) => {
            let result = service.list(&ticket.query).await;
            ServiceEvent::Listed { ticket, result }
        }
        ServiceCommand::Create { url } => ServiceEvent::Created(service.create(&url).await),
        ServiceCommand::Start { ids } => {
            let result = service.start_batch(&ids).await;
            ServiceEvent::Started { ids, result }
        }
        ServiceCommand::Delete { ids } => {
            let result = service.delete_batch(&ids).await;
            ServiceEvent::Deleted { ids, result }
        }
        ServiceCommand::Get { id } => {
            let result = service.get_one(&id).await;
            ServiceEvent::Fetched { id, result }
        }
        ServiceCommand::Health => ServiceEvent::HealthChecked(service.health().await),
    }
}
