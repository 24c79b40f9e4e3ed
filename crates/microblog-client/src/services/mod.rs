//! Domain services, one per API area.
//!
//! Each method performs exactly one REST call (refresh and replay aside) and returns the
//! typed payload, never the response envelope.

pub mod auth;
pub mod posts;
pub mod reports;
pub mod users;

use serde::Deserialize;

pub use auth::{AuthService, LoginResponse};
pub use posts::{FeedPage, PostThread, PostsService};
pub use reports::ReportsService;
pub use users::{FollowResponse, UserProfile, UsersService};

/// `{"message": "..."}` acknowledgement returned by action endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
