//! ctw - ticket wrangler.
//!
//! The binary resolves settings with [`ctw_config`], builds the active
//! backend through [`registry`], and runs one of the [`commands`].

pub mod commands;
pub mod output;
pub mod registry;

pub use registry::{Endpoints, Provider};
