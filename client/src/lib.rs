//! TeamUp client core: forms, submission workflows, loaders, and adapters.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
