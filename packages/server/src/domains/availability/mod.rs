//! Group availability overlap (`POST /availability/overlap`).

pub mod activities;
pub mod models;

pub use models::{AvailabilityLevel, OverlapRequest, OverlapResponse, SlotOverlap};
