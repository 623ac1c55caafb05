use tracing::{debug, warn};

use super::models::{CategorySource, ClassifyRequest, ClassifyResponse, CATEGORY_SET, FALLBACK_CATEGORY};
use crate::kernel::ServerDeps;

/// Case-insensitive exact membership; returns the canonical spelling.
pub fn canonical_category(label: &str) -> Option<&'static str> {
    let label = label.trim();
    CATEGORY_SET
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(label))
}

/// Coerce a model reply onto the closed set.
///
/// Surrounding quotes, backticks, asterisks and a trailing period are
/// tolerated. Anything else, extra words included, becomes the fallback.
pub fn coerce_reply(raw: &str) -> &'static str {
    let cleaned = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '.') || c.is_whitespace());
    canonical_category(cleaned).unwrap_or(FALLBACK_CATEGORY)
}

pub fn build_classify_prompt(name: &str, cuisine: &str, description: &str) -> String {
    format!(
        "Classify this restaurant into exactly one category.

Allowed categories: {categories}

Restaurant name: {name}
Cuisine: {cuisine}
Description: {description}

Reply with the category name only. No punctuation, no explanation.",
        categories = CATEGORY_SET.join(", "),
        name = if name.is_empty() { "(unknown)" } else { name },
        cuisine = if cuisine.is_empty() { "(unknown)" } else { cuisine },
        description = if description.is_empty() { "(none)" } else { description },
    )
}

/// Classify a restaurant. Never fails: errors degrade to a fallback label.
pub async fn classify_restaurant(request: ClassifyRequest, deps: &ServerDeps) -> ClassifyResponse {
    let field = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
    let name = field(&request.name);
    let cuisine = field(&request.cuisine);
    let description = field(&request.description);

    if name.is_empty() && cuisine.is_empty() && description.is_empty() {
        return ClassifyResponse::fallback(FALLBACK_CATEGORY);
    }

    let prompt = build_classify_prompt(&name, &cuisine, &description);
    match deps.ai.generate(&deps.models.summary, &prompt).await {
        Ok(reply) => {
            let category = coerce_reply(&reply);
            debug!(name = %name, reply = %reply.trim(), category, "Classified restaurant");
            ClassifyResponse {
                category: category.to_string(),
                source: CategorySource::Model,
            }
        }
        Err(e) => {
            let category = canonical_category(&cuisine).unwrap_or(FALLBACK_CATEGORY);
            warn!(name = %name, error = %e, category, "Classification failed, using fallback");
            ClassifyResponse::fallback(category)
        }
    }
}
