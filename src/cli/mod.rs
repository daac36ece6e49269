//! CLI module
//!
//! Command-line interface over the API services.
//!
//! # Commands
//!
//! - `request` - Send an arbitrary request through the authenticated client
//! - `courses` - List the instructor's courses
//! - `upload` - Upload a thumbnail or lesson video
//! - `invoice` - Show a payment invoice
//! - `refresh` - Refresh the session

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
