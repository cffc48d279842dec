//! Email templates and the selector that maps a template key plus untyped
//! data onto one of them.
//!
//! Every supported key has its own data record. [`generate_email_template`]
//! rejects unknown keys and data that does not fit the key's record, so
//! everything past it works with typed data only.

mod invite_user;
mod order_placed;
mod password_reset;

use askama::Template;
use chrono::{Datelike, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::errors::ServiceError;
use std::{fmt, str::FromStr};
use tracing::{debug, error};

pub use self::invite_user::{INVITE_USER, InviteUserTemplateData};
pub use self::order_placed::{
    DisplayId, ORDER_PLACED, OrderItem, OrderPlacedTemplateData, OrderSummary, ShippingAddress,
    format_amount,
};
pub use self::password_reset::{PASSWORD_RESET, PasswordResetTemplateData};

pub const STORE_NAME: &str = "Your Store";
const DEFAULT_PREVIEW: &str = "Store Notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    InviteUser,
    OrderPlaced,
    PasswordReset,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 3] = [
        TemplateKey::InviteUser,
        TemplateKey::OrderPlaced,
        TemplateKey::PasswordReset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::InviteUser => INVITE_USER,
            TemplateKey::OrderPlaced => ORDER_PLACED,
            TemplateKey::PasswordReset => PASSWORD_RESET,
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKey {
    type Err = ServiceError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        TemplateKey::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == key)
            .ok_or_else(|| ServiceError::invalid_data(format!("Unknown template key: \"{key}\"")))
    }
}

/// Shared chrome around every template body.
pub struct Layout<'a> {
    pub preview: &'a str,
    pub title: Option<&'a str>,
    pub year: i32,
    pub store_name: &'a str,
}

impl<'a> Layout<'a> {
    fn new(preview: Option<&'a str>, title: Option<&'a str>) -> Self {
        Self {
            preview: preview.unwrap_or(DEFAULT_PREVIEW),
            title,
            year: Utc::now().year(),
            store_name: STORE_NAME,
        }
    }
}

/// Validated data for one template key.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailTemplateData {
    InviteUser(InviteUserTemplateData),
    OrderPlaced(OrderPlacedTemplateData),
    PasswordReset(PasswordResetTemplateData),
}

impl EmailTemplateData {
    pub fn key(&self) -> TemplateKey {
        match self {
            EmailTemplateData::InviteUser(_) => TemplateKey::InviteUser,
            EmailTemplateData::OrderPlaced(_) => TemplateKey::OrderPlaced,
            EmailTemplateData::PasswordReset(_) => TemplateKey::PasswordReset,
        }
    }

    /// Renders the HTML document for this template.
    pub fn render(&self) -> Result<String, askama::Error> {
        match self {
            EmailTemplateData::InviteUser(data) => data.template().render(),
            EmailTemplateData::OrderPlaced(data) => data.template().render(),
            EmailTemplateData::PasswordReset(data) => data.template().render(),
        }
    }
}

/// Selects the template for `template_key` and checks `data` fits it.
pub fn generate_email_template(
    template_key: &str,
    data: &Value,
) -> Result<EmailTemplateData, ServiceError> {
    let key = template_key.parse::<TemplateKey>().inspect_err(|_| {
        error!("Unknown template key: {template_key}");
    })?;

    debug!(template = %key, "validating template data");

    let generated = match key {
        TemplateKey::InviteUser => EmailTemplateData::InviteUser(guard(key, data)?),
        TemplateKey::OrderPlaced => EmailTemplateData::OrderPlaced(guard(key, data)?),
        TemplateKey::PasswordReset => EmailTemplateData::PasswordReset(guard(key, data)?),
    };

    Ok(generated)
}

/// Accepts `data` only when it is a JSON object that decodes into `T`.
fn guard<T: DeserializeOwned>(key: TemplateKey, data: &Value) -> Result<T, ServiceError> {
    let invalid = || ServiceError::invalid_data(format!("Invalid data for template \"{key}\""));

    if !data.is_object() {
        error!(template = %key, "template data is not an object");
        return Err(invalid());
    }

    serde_json::from_value(data.clone()).map_err(|e| {
        error!(template = %key, reason = %e, "template data rejected");
        invalid()
    })
}
