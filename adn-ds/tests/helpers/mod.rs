//! Shared helpers for adn-ds integration tests

#![allow(dead_code)]

pub mod audio_generator;
pub mod multipart;
