//! Shared API types

pub mod types;

pub use types::{DenoiseResponse, ErrorResponse, HealthResponse, MessageResponse};
