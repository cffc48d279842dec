//! Shared fixtures: an in-memory mail transport and a config pointing at it.

#![allow(dead_code)]

use async_trait::async_trait;
use email_notifications::{app::EmailNotificationsApp, state::AppState};
use shared::{
    abstract_trait::MailTransportTrait, config::Config, domain::requests::EmailMessage,
    errors::TransportError,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub const BACKEND_URL: &str = "https://store.test";
pub const FROM: &str = "shop@example.com";

/// Records every message instead of talking to a server.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<EmailMessage>>,
    failure: Option<TransportError>,
}

impl RecordingTransport {
    pub fn failing(failure: TransportError) -> Self {
        Self {
            sent: Mutex::default(),
            failure: Some(failure),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransportTrait for RecordingTransport {
    async fn verify(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SMTP_HOST", "smtp.test"),
        ("SMTP_FROM_EMAIL", FROM),
        ("BACKEND_URL", "https://store.test/"),
        ("STORE_CORS", "http://localhost:8000"),
    ]);

    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

pub async fn test_state(transport: Arc<RecordingTransport>) -> AppState {
    EmailNotificationsApp::build_state(&test_config(), transport).await
}
