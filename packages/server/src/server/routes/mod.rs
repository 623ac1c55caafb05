// HTTP routes
pub mod availability;
pub mod events;
pub mod extract;
pub mod health;
pub mod plan;
pub mod restaurants;
pub mod reviews;

pub use availability::*;
pub use events::*;
pub use extract::*;
pub use health::*;
pub use plan::*;
pub use restaurants::*;
pub use reviews::*;
