use askama::Template;
use serde::{Deserialize, Serialize};

use super::Layout;

pub const INVITE_USER: &str = "invite-user";

const DEFAULT_PREVIEW: &str = "You've been invited to join the store team";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteUserTemplateData {
    #[serde(rename = "inviteLink")]
    pub invite_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Template)]
#[template(path = "invite_user.html")]
pub struct InviteUserTemplate<'a> {
    pub layout: Layout<'a>,
    pub invite_link: &'a str,
}

impl InviteUserTemplateData {
    pub fn template(&self) -> InviteUserTemplate<'_> {
        InviteUserTemplate {
            layout: Layout::new(
                Some(self.preview.as_deref().unwrap_or(DEFAULT_PREVIEW)),
                Some("You're invited"),
            ),
            invite_link: &self.invite_link,
        }
    }
}
