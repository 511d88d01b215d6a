//! Hosted REST outbound adapters.
//!
//! This module provides thin HTTP implementations of the repository ports
//! and the session port against a PostgREST-style service.

mod client;
mod dto;
mod query;
mod session;

pub use client::{RestBackend, RestConfig, RestSetupError};
pub use session::RestSessionProvider;
