//! Meetup plan generation (`POST /review`).

pub mod activities;
pub mod fixtures;
pub mod models;

pub use models::{PlanRequest, PlanResponse};
