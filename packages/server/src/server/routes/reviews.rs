use axum::{extract::Extension, Json};

use crate::common::ApiResult;
use crate::domains::reviews::activities::summarize_reviews;
use crate::domains::reviews::{SentimentSummary, SummarizeRequest};
use crate::server::app::AppState;

pub async fn summarize_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<Json<SentimentSummary>> {
    Ok(Json(summarize_reviews(request, &state.deps).await?))
}
