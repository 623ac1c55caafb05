// LettuceEat - API Core
//
// Backend for restaurant discovery and meetup planning: AI proxy endpoints,
// the extraction stream relay, event invites and availability overlap.
//
// Business logic is organized per-domain in domains/*/activities.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
