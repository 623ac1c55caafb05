pub mod availability;
pub mod classification;
pub mod events;
pub mod listings;
pub mod planning;
pub mod relay;
pub mod reviews;
