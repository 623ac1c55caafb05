use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::models::{EventCreated, EventRequest, InvitePayload};
use crate::common::{ApiError, ApiResult};
use crate::domains::planning::activities::prompt::{resolve_food_type, word_budget};
use crate::kernel::ServerDeps;

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// Validate the request and shape the webhook body.
pub fn build_invite_payload(request: &EventRequest) -> ApiResult<InvitePayload> {
    let event_name = non_blank(request.event_name.as_deref())
        .ok_or_else(|| ApiError::Validation("Event name required".into()))?;
    let date_time = non_blank(request.date_time.as_deref())
        .ok_or_else(|| ApiError::Validation("Date and time required".into()))?;

    // Blank food type falls back to the restaurant's category first
    let food_type = resolve_food_type(
        non_blank(request.food_type.as_deref())
            .or_else(|| non_blank(request.restaurant_category.as_deref()))
            .as_deref(),
    );

    Ok(InvitePayload {
        emails: request
            .emails
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect(),
        event_name,
        restaurant: non_blank(request.restaurant.as_deref()),
        date_time,
        friend_message: non_blank(request.friend_message.as_deref()),
        output: request.output.clone().filter(|o| !o.trim().is_empty()),
        food_type,
        comparison_metric: non_blank(request.comparison_metric.as_deref()),
        max_words: word_budget(request.max_words.as_ref()),
    })
}

pub fn confirmation_message(payload: &InvitePayload) -> String {
    match &payload.restaurant {
        Some(restaurant) => format!(
            "Your event \"{}\" at {} has been created!",
            payload.event_name, restaurant
        ),
        None => format!("Your event \"{}\" has been created!", payload.event_name),
    }
}

/// Create the event and hand the webhook call to a detached task.
///
/// The confirmation never waits on the webhook; its outcome is only logged.
/// The returned handle lets tests await delivery.
pub fn create_event(
    request: EventRequest,
    deps: &ServerDeps,
) -> ApiResult<(EventCreated, JoinHandle<()>)> {
    let payload = build_invite_payload(&request)?;
    let event_id = Uuid::new_v4();
    let created = EventCreated {
        event_id,
        created: true,
        message: confirmation_message(&payload),
    };

    let webhook = deps.webhook.clone();
    let handle = tokio::spawn(async move {
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Failed to encode invite payload");
                return;
            }
        };
        match webhook.dispatch(&body).await {
            Ok(Some(status)) => info!(event_id = %event_id, status, "Invite webhook delivered"),
            Ok(None) => {}
            Err(e) => warn!(event_id = %event_id, error = %e, "Invite webhook failed"),
        }
    });

    info!(event_id = %event_id, invitees = request.emails.len(), "Event created");
    Ok((created, handle))
}
