use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use shared::{
    domain::event::DomainEvent,
    errors::{HttpError, ServiceError},
    events::EventBus,
};
use std::sync::Arc;
use tracing::{error, info};
use utoipa_axum::router::OpenApiRouter;

/// Decodes host events and hands them to the local bus.
pub struct EventHandler {
    event_bus: Arc<EventBus>,
}

impl EventHandler {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self { event_bus }
    }

    pub async fn handle_payload(&self, payload: &[u8]) -> Result<String, ServiceError> {
        if payload.is_empty() {
            return Err(ServiceError::invalid_data("Empty event payload"));
        }

        let event: DomainEvent = serde_json::from_slice(payload).map_err(|e| {
            let payload_str = String::from_utf8_lossy(payload);
            error!("Failed to unmarshal event: {e}, payload: {payload_str}");
            ServiceError::invalid_data(format!("Invalid JSON payload: {e}"))
        })?;

        info!(
            event = %event.name,
            subscribers = self.event_bus.subscriber_count(&event.name),
            "Event received"
        );

        self.event_bus.emit(&event).await?;

        Ok(event.name)
    }
}

#[utoipa::path(
    post,
    path = "/hooks/events",
    request_body(content = String, content_type = "application/json", description = "Event as `{name, data}`"),
    responses(
        (status = 200, description = "Event delivered to every subscriber"),
        (status = 400, description = "Malformed event or rejected data", body = shared::errors::ErrorResponse),
        (status = 500, description = "A subscriber failed", body = shared::errors::ErrorResponse)
    ),
    tag = "Hooks"
)]
pub async fn receive_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let name = state.event_handler.handle_payload(&body).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "success",
            "message": format!("Event {name} processed"),
        })),
    ))
}

pub fn event_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/hooks/events", post(receive_event))
        .with_state(app_state)
}
