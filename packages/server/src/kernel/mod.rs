//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GenAiAdapter, HttpWebhook, ModelConfig, ServerDeps, YellowcakeAdapter};
pub use test_dependencies::{MockAI, MockExtractor, MockWebhook, TestDependencies};
pub use traits::*;
