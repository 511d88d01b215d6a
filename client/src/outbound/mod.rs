//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process tables used by tests and the demo mode
//! - **rest**: reqwest-backed adapters for the hosted service
//!
//! Adapters translate between domain types and wire representations. They
//! contain no business logic.

pub mod memory;
pub mod rest;
