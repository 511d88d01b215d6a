//! Terminal rendering of the client pages.
//!
//! Pages turn loader view models into plain text. The terminal notifier and
//! surface implement the presentation ports so workflows can report back to
//! whoever is driving the binary.

mod pages;
mod terminal;

pub use pages::{render_dashboard, render_explore, render_project_details, render_report};
pub use terminal::{TerminalNotifier, TerminalSurface};
