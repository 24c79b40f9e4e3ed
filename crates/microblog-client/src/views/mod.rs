//! Screen state machines.
//!
//! Each view owns its data and exposes async actions plus read-only accessors; front ends
//! render from the accessors. Dropping (or closing) a view abandons work still in flight.

pub mod auth;
pub mod composer;
pub mod feed;
pub mod paged;
pub mod post_detail;
pub mod profile;
pub mod report;
pub mod settings;

pub use auth::{LoginView, SignupView};
pub use composer::{Composer, CounterStyle};
pub use feed::FeedView;
pub use paged::{LoadKind, PageTicket, PagedList};
pub use post_detail::PostDetailView;
pub use profile::ProfileView;
pub use report::{ReportDialog, ReportState};
pub use settings::{DeleteStep, SettingsView};
