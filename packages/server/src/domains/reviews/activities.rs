//! Two-sided review summarization.

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::models::{SentimentSummary, SummarizeRequest};
use crate::common::json_extract::parse_object;
use crate::common::{ApiError, ApiResult};
use crate::kernel::ServerDeps;

/// Reviews kept per side.
pub const MAX_REVIEWS_PER_SIDE: usize = 10;

/// Strings only, trimmed, non-empty, capped.
pub fn clean_reviews(reviews: &[Value]) -> Vec<String> {
    reviews
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .take(MAX_REVIEWS_PER_SIDE)
        .map(String::from)
        .collect()
}

fn require_list<'a>(list: &'a Option<Vec<Value>>, field: &str) -> ApiResult<&'a [Value]> {
    match list {
        Some(items) if !items.is_empty() => Ok(items.as_slice()),
        _ => Err(ApiError::Validation(format!(
            "Missing or invalid {}. Expected an array of strings.",
            field
        ))),
    }
}

fn bullets(reviews: &[String]) -> String {
    reviews
        .iter()
        .map(|r| format!("- {}", r))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_summary_prompt(
    restaurant_name: Option<&str>,
    positive: &[String],
    negative: &[String],
) -> String {
    let restaurant = restaurant_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("Restaurant: {}", n))
        .unwrap_or_default();

    format!(
        "You are a concise restaurant review summarizer.

{restaurant}

Positive reviews:
{positive}

Negative reviews:
{negative}

Instructions:
- Write 1 short sentence summarizing the positive reviews.
- Write 1 short sentence summarizing the negative reviews.
- Keep each sentence under 20 words.
- No bullet points, no headings, no emojis.
- Do not mention being an AI.
- Return EXACT JSON with keys: positiveSummary, negativeSummary.",
        positive = bullets(positive),
        negative = bullets(negative),
    )
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Read the model's reply, tolerating prose around the JSON object.
pub fn parse_summary(raw: &str) -> ApiResult<SentimentSummary> {
    let obj: Map<String, Value> = parse_object(raw).ok_or_else(|| {
        warn!(raw_len = raw.len(), "Summary reply is not a JSON object");
        ApiError::parse("Model returned invalid JSON", raw)
    })?;

    Ok(SentimentSummary {
        positive_summary: text_field(&obj, "positiveSummary"),
        negative_summary: text_field(&obj, "negativeSummary"),
    })
}

/// Validate both lists, then make one summary call.
///
/// Validation failures never reach the model.
pub async fn summarize_reviews(
    request: SummarizeRequest,
    deps: &ServerDeps,
) -> ApiResult<SentimentSummary> {
    let positive = clean_reviews(require_list(&request.positive_reviews, "positiveReviews")?);
    let negative = clean_reviews(require_list(&request.negative_reviews, "negativeReviews")?);
    if positive.is_empty() || negative.is_empty() {
        return Err(ApiError::Validation("No valid review strings provided.".into()));
    }

    let prompt = build_summary_prompt(request.restaurant_name.as_deref(), &positive, &negative);
    let raw = deps.ai.generate(&deps.models.summary, &prompt).await?;
    let summary = parse_summary(raw.trim())?;

    info!(
        positive = positive.len(),
        negative = negative.len(),
        "Summarized reviews"
    );
    Ok(summary)
}
