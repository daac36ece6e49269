//! Session recovery module
//!
//! The session itself lives on the backend as an HTTP-only cookie; this
//! module only decides when to refresh it and what happens when it is gone.
//!
//! - `RefreshCoordinator` makes the refresh call single-flight
//! - `Navigator` receives the redirect to the login entry point

mod coordinator;
mod navigator;
mod types;

pub use coordinator::{RefreshCoordinator, RefreshGuard, RefreshOutcome, RefreshWaiter};
pub use navigator::{Navigator, RecordingNavigator, TracingNavigator};
pub use types::{is_truthy, ForbiddenBody, RefreshResponse};
