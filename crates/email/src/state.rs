use crate::handler::EventHandler;
use prometheus_client::registry::Registry;
use shared::abstract_trait::DynNotificationService;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub notification_service: DynNotificationService,
    pub event_handler: Arc<EventHandler>,
    pub registry: Arc<Mutex<Registry>>,
    pub backend_url: String,
}
