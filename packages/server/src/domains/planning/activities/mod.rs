pub mod generate;
pub mod prompt;

pub use generate::generate_plan;
pub use prompt::{build_plan_prompt, resolve_food_type, word_budget};
