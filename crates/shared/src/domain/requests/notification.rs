use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single address or a list of them, as accepted in `emailOptions.cc`/`bcc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Recipients::One(address) => vec![address],
            Recipients::Many(addresses) => addresses,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Recipients>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Recipients>,
    #[serde(rename = "replyTo", default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub content: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Send request handed to a notification provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub to: String,
    pub channel: Channel,
    pub template: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl NotificationRequest {
    pub fn email(to: impl Into<String>, template: impl Into<String>, data: Value) -> Self {
        Self {
            to: to.into(),
            channel: Channel::Email,
            template: template.into(),
            data,
            from: None,
            attachments: None,
        }
    }

    /// Decodes a request arriving as untyped JSON. An absent payload is
    /// rejected the same way a malformed one is.
    pub fn from_value(value: Value) -> Result<Self, ServiceError> {
        if value.is_null() {
            return Err(ServiceError::invalid_data(
                "No notification information provided",
            ));
        }

        serde_json::from_value(value).map_err(|e| {
            ServiceError::invalid_data(format!("Invalid notification payload: {e}"))
        })
    }

    /// `data.emailOptions`, or defaults when missing or malformed.
    pub fn email_options(&self) -> EmailOptions {
        match self.data.get("emailOptions") {
            None | Some(Value::Null) => EmailOptions::default(),
            Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
                warn!(template = %self.template, error = %e, "ignoring malformed emailOptions");
                EmailOptions::default()
            }),
        }
    }
}
