//! Scenemark - scene cuts to DAW marker tracks
//!
//! This library crate exposes the configuration, progress reporting and
//! marker pipeline behind the `scenemark` binary, for integration testing
//! and embedding.

pub mod config;
pub mod pipeline;
pub mod progress;
