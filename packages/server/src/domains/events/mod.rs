//! Event creation and invite webhook (`POST /events`).

pub mod activities;
pub mod models;

pub use models::{EventCreated, EventRequest, InvitePayload};
