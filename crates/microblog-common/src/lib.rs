//! # microblog-common
//!
//! Shared types, configuration, error payloads and utilities used by the Microblog client crates.
//! This is the foundation layer: no network access, just primitives and contracts.

pub mod config;
pub mod error;
pub mod models;
pub mod time;
pub mod validation;
