use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PASSWORD_RESET_EVENT: &str = "auth.password_reset";

/// Event as delivered by the host: a name and an untyped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

impl DomainEvent {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetEvent {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "actorType", default)]
    pub actor_type: Option<String>,
}
