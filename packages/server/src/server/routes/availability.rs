use axum::Json;

use crate::common::ApiResult;
use crate::domains::availability::activities::compute_overlap;
use crate::domains::availability::{OverlapRequest, OverlapResponse};

pub async fn availability_handler(
    Json(request): Json<OverlapRequest>,
) -> ApiResult<Json<OverlapResponse>> {
    Ok(Json(compute_overlap(&request)?))
}
