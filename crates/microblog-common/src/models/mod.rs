//! Domain models exchanged with the Microblog API.
//!
//! Field names match the API's snake_case JSON. IDs are the server's integer keys.

pub mod post;
pub mod user;

pub use post::*;
pub use user::*;
