use askama::Template;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shared::domain::requests::EmailOptions;

use super::Layout;

pub const PASSWORD_RESET: &str = "password-reset";

const DEFAULT_PREVIEW: &str = "Reset your password";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetTemplateData {
    #[serde(rename = "resetLink")]
    pub reset_link: String,
    pub email: String,
    /// Must be present; a malformed value falls back to the defaults.
    #[serde(rename = "emailOptions", deserialize_with = "lenient_email_options")]
    pub email_options: EmailOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

fn lenient_email_options<'de, D>(deserializer: D) -> Result<EmailOptions, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

#[derive(Template)]
#[template(path = "password_reset.html")]
pub struct PasswordResetTemplate<'a> {
    pub layout: Layout<'a>,
    pub email: &'a str,
    pub reset_link: &'a str,
}

impl PasswordResetTemplateData {
    pub fn template(&self) -> PasswordResetTemplate<'_> {
        PasswordResetTemplate {
            layout: Layout::new(
                Some(self.preview.as_deref().unwrap_or(DEFAULT_PREVIEW)),
                None,
            ),
            email: &self.email,
            reset_link: &self.reset_link,
        }
    }
}
