//! # Audio Denoiser Common Library
//!
//! Shared code for the denoiser services:
//! - Error type
//! - Bootstrap configuration (TOML file with compiled defaults)
//! - Logging initialisation
//! - JSON request/response types used on both sides of the loopback call

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
