use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct TestEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub to: String,
}
