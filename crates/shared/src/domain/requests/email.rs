/// Fully composed outbound email, ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Option<String>,
    pub attachments: Vec<MailAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub content: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub disposition: String,
    pub content_id: Option<String>,
}

impl MailAttachment {
    pub fn is_inline(&self) -> bool {
        self.disposition.eq_ignore_ascii_case("inline") && self.content_id.is_some()
    }
}
