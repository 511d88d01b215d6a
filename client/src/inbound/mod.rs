//! Inbound adapters driving the domain.
//!
//! - **cli**: terminal pages, notification sink, and form surface used by the
//!   `teamup` binary

pub mod cli;
