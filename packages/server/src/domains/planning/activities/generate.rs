use tracing::info;

use super::prompt::build_plan_prompt;
use crate::common::ApiResult;
use crate::domains::planning::models::{PlanRequest, PlanResponse};
use crate::kernel::ServerDeps;

/// Build the plan prompt, ask the plan model once, and return its text.
pub async fn generate_plan(request: PlanRequest, deps: &ServerDeps) -> ApiResult<PlanResponse> {
    let prompt = build_plan_prompt(&request);
    let text = deps.ai.generate(&deps.models.plan, &prompt).await?;

    info!(
        model = %deps.models.plan,
        prompt_len = prompt.len(),
        reply_len = text.len(),
        "Generated meetup plan"
    );

    Ok(PlanResponse {
        text,
        prompt,
        friend_message: request.friend_message.filter(|m| !m.is_empty()),
    })
}
