//! Meetup plan prompt builder.
//!
//! Pure: equal requests produce byte-identical prompts.

use crate::domains::planning::fixtures::{DirectoryEntry, RESTAURANT_DIRECTORY};
use crate::domains::planning::models::PlanRequest;

pub const DEFAULT_FOOD_TYPE: &str = "Local Cuisine";
pub const DEFAULT_METRIC: &str = "overall best experience";
pub const DEFAULT_MAX_WORDS: u64 = 25;
const NOT_PROVIDED: &str = "(not provided)";
const NO_NAMES: &str = "(no names provided)";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Word budget in whole words: finite positive numbers only, fractions
/// round up. Numeric strings do not count.
///
/// Shared by the plan prompt and the invite webhook so both carry the same value.
pub fn word_budget(value: Option<&serde_json::Value>) -> u64 {
    value
        .and_then(serde_json::Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.ceil().min(u64::MAX as f64) as u64)
        .unwrap_or(DEFAULT_MAX_WORDS)
}

pub fn resolve_food_type(food_type: Option<&str>) -> String {
    non_blank(food_type).unwrap_or(DEFAULT_FOOD_TYPE).to_string()
}

fn format_entry(entry: &DirectoryEntry) -> String {
    let reviews: Vec<String> = entry.reviews.iter().map(|r| format!("- {}", r)).collect();
    format!(
        "{}: {}\nReviews:\n{}",
        entry.name,
        entry.description,
        reviews.join("\n")
    )
}

/// The directory block: one paragraph per restaurant.
pub fn format_directory() -> String {
    RESTAURANT_DIRECTORY
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_plan_prompt(request: &PlanRequest) -> String {
    let food_type = resolve_food_type(request.food_type.as_deref());
    let metric = non_blank(request.comparison_metric.as_deref()).unwrap_or(DEFAULT_METRIC);
    let max_words = word_budget(request.max_words.as_ref());
    let invited = match &request.invited {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => NO_NAMES.to_string(),
    };
    let or_missing = |value: &Option<String>| -> String {
        non_blank(value.as_deref()).unwrap_or(NOT_PROVIDED).to_string()
    };

    format!(
        "### ROLE
You are a friendly, enthusiastic organizer specializing in {food_type}. Your tone is helpful, inviting, and decisive.

### DATA (Restaurant Descriptions + Reviews)
{directory}

### USER REQUEST
Create a concise meetup plan based on the details below.

Event name: {event_name}
Restaurant: {restaurant}
Food type: {food_type}
Time: {time}
Invited: {invited}
Friend message: {friend_message}
Plan focus: {metric}

### INSTRUCTIONS
1. Use the restaurant descriptions to choose the best fit for the plan focus.
2. Write a short plan (maximum {max_words} words) that includes a suggested dress code (e.g., business casual), the meetup time, and a friendly summary for the group.
3. Do not mention that you are an AI or that you are analyzing data; speak as a human organizer.

### PLAN",
        directory = format_directory(),
        event_name = or_missing(&request.event_name),
        restaurant = or_missing(&request.restaurant_name),
        time = or_missing(&request.date_time),
        friend_message = or_missing(&request.friend_message),
    )
}
