use axum::{extract::Extension, Json};

use crate::common::ApiResult;
use crate::domains::planning::activities::generate_plan;
use crate::domains::planning::{PlanRequest, PlanResponse};
use crate::server::app::AppState;

pub async fn plan_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<PlanRequest>,
) -> ApiResult<Json<PlanResponse>> {
    Ok(Json(generate_plan(request, &state.deps).await?))
}
