use axum::{extract::Extension, http::StatusCode, Json};

use crate::common::ApiResult;
use crate::domains::events::activities::create_event;
use crate::domains::events::{EventCreated, EventRequest};
use crate::server::app::AppState;

/// Responds as soon as the event is accepted; the webhook task runs detached.
pub async fn create_event_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<EventRequest>,
) -> ApiResult<(StatusCode, Json<EventCreated>)> {
    let (created, _webhook) = create_event(request, &state.deps)?;
    Ok((StatusCode::CREATED, Json(created)))
}
