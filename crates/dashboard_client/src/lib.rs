//! Dashboard client: the analysis-service boundary and its background runner.
mod error;
mod handle;
mod http;
mod service;
mod settings;
mod wire;

pub use error::ClientError;
pub use handle::{ChannelEventSink, EventSink, ServiceCommand, ServiceEvent, ServiceHandle};
pub use http::HttpAnalysisService;
pub use service::AnalysisService;
pub use settings::ServiceSettings;
