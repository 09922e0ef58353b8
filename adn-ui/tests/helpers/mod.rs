//! Shared helpers for adn-ui integration tests

#![allow(dead_code)]

pub mod audio_generator;
pub mod multipart;
