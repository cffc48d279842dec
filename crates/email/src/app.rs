use crate::{
    handler::{AppRouter, EventHandler},
    service::{LettreSmtpTransport, NotificationModuleService, SmtpNotificationProvider},
    state::AppState,
    subscriber::PasswordResetSubscriber,
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynMailTransport, DynNotificationProvider, DynNotificationService},
    config::Config,
    domain::requests::Channel,
    events::EventBus,
    utils::Metrics,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub struct EmailNotificationsApp {
    config: Config,
}

impl EmailNotificationsApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Wires provider, notification service and subscribers around `transport`.
    pub async fn build_state(config: &Config, transport: DynMailTransport) -> AppState {
        let mut registry = Registry::default();

        let provider = Arc::new(
            SmtpNotificationProvider::new(
                config.smtp.from.clone(),
                transport,
                Metrics::new(),
                &mut registry,
            )
            .await,
        ) as DynNotificationProvider;

        let mut notifications = NotificationModuleService::new();
        notifications.register(&[Channel::Email], provider);
        let notification_service = Arc::new(notifications) as DynNotificationService;

        let mut event_bus = EventBus::new();
        event_bus.subscribe(Arc::new(PasswordResetSubscriber::new(
            notification_service.clone(),
            config.backend_url.clone(),
            config.smtp.from.clone(),
        )));

        AppState {
            notification_service,
            event_handler: Arc::new(EventHandler::new(Arc::new(event_bus))),
            registry: Arc::new(Mutex::new(registry)),
            backend_url: config.backend_url.clone(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let transport = Arc::new(LettreSmtpTransport::new(&self.config.smtp)?) as DynMailTransport;

        let state = Self::build_state(&self.config, transport).await;
        let router = AppRouter::build(state, &self.config.store_cors);

        info!("Starting email notifications service...");
        AppRouter::serve(self.config.port, router).await
    }
}
