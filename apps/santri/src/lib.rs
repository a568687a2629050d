//! # Santri Library
//!
//! This library exposes the Santri modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;

// Re-export santri_core for convenience
pub use santri_core;
