//! Async client for the Microblog REST API.
//!
//! Layers, bottom up:
//!
//! - [`http::ApiClient`] attaches the bearer token and transparently refreshes it once on a 401.
//! - [`services`] map one call each onto the REST endpoints.
//! - [`session::SessionStore`] tracks who is signed in.
//! - [`views`] hold per-screen state (paging, forms, confirmations) for a front end to render.
//!
//! Browser concerns are traits: [`storage::TokenStore`] for the persisted token and
//! [`navigation::Navigator`] for moving between screens.

pub mod client;
mod defer;
pub mod error;
pub mod http;
pub mod navigation;
pub mod render;
pub mod services;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod testing;

pub use client::MicroblogClient;
pub use error::{ClientError, Result};
pub use http::ApiClient;
pub use navigation::{Guard, MemoryNavigator, Navigator, Route, guard};
pub use session::{Session, SessionStore};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
