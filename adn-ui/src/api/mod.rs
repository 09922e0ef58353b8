//! HTTP API handlers for adn-ui

pub mod denoise;
pub mod health;
pub mod output;
pub mod ui;

pub use denoise::{denoise, denoise_routes};
pub use health::{health_check, health_routes};
pub use output::{download_output, output_routes, play_output};
pub use ui::{serve_app_js, serve_index, ui_routes};
