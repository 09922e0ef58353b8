//! HTTP API handlers for adn-ds

pub mod denoise;
pub mod health;

pub use denoise::{denoise, denoise_routes};
pub use health::{health_check, health_routes, root_message, READY_MESSAGE};
