use crate::{
    middleware::validate::SimpleValidatedJson,
    state::AppState,
    subscriber::reset_link,
    templates::{PASSWORD_RESET, PasswordResetTemplateData},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use shared::domain::{
    requests::{EmailOptions, NotificationRequest, TestEmailRequest},
    responses::TestEmailResponse,
};
use std::sync::Arc;
use tracing::{error, info};
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

const TEST_SUBJECT: &str = "Test Email from SMTP";

#[utoipa::path(
    post,
    path = "/store/test-email",
    request_body = TestEmailRequest,
    responses(
        (status = 200, description = "Test email sent", body = TestEmailResponse),
        (status = 400, description = "Invalid request body", body = TestEmailResponse),
        (status = 500, description = "Sending failed", body = TestEmailResponse)
    ),
    tag = "Store"
)]
pub async fn send_test_email(
    State(state): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<TestEmailRequest>,
) -> impl IntoResponse {
    let token = Uuid::new_v4().to_string();

    let data = PasswordResetTemplateData {
        reset_link: reset_link(&state.backend_url, &token),
        email: body.to.clone(),
        email_options: EmailOptions {
            subject: Some(TEST_SUBJECT.to_string()),
            ..Default::default()
        },
        preview: None,
    };

    let data = match serde_json::to_value(data) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to encode test email data: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestEmailResponse::failed(e.to_string())),
            );
        }
    };

    let request = NotificationRequest::email(body.to.as_str(), PASSWORD_RESET, data);

    match state.notification_service.create_notification(request).await {
        Ok(()) => {
            info!("Test email sent to {}", body.to);
            (
                StatusCode::OK,
                Json(TestEmailResponse::ok("Test email sent successfully")),
            )
        }
        Err(e) => {
            error!("Test email to {} failed: {e}", body.to);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestEmailResponse::failed(e.message())),
            )
        }
    }
}

pub fn test_email_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/store/test-email", post(send_test_email))
        .with_state(app_state)
}
