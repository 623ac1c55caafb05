use axum::{extract::Extension, Json};

use crate::common::ApiResult;
use crate::domains::classification::activities::classify_restaurant;
use crate::domains::classification::{ClassifyRequest, ClassifyResponse};
use crate::domains::listings::activities::search_restaurants;
use crate::domains::listings::{SearchRequest, SearchResponse};
use crate::server::app::AppState;

/// Always 200: classification failures degrade to a fallback label.
pub async fn categorize_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    Json(classify_restaurant(request, &state.deps).await)
}

pub async fn search_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    Ok(Json(search_restaurants(request, &state.deps).await?))
}
