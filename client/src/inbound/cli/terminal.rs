//! Presentation ports backed by a terminal stream.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::domain::ports::{FormSurface, Notification, NotificationVariant, Notifier, Route};

const fn marker(variant: NotificationVariant) -> &'static str {
    match variant {
        NotificationVariant::Default => "ok",
        NotificationVariant::Info => "info",
        NotificationVariant::Destructive => "error",
    }
}

/// Writes each notification as one line to a stream.
pub struct TerminalNotifier {
    out: Mutex<Box<dyn Write + Send>>,
    shown: Mutex<Vec<Notification>>,
}

impl TerminalNotifier {
    /// Notifier writing to `out`.
    #[must_use]
    pub const fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Notifier writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Notifications shown so far, oldest first.
    #[must_use]
    pub fn shown(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether any failure was reported.
    #[must_use]
    pub fn reported_failure(&self) -> bool {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(Notification::is_destructive)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = format!(
            "[{}] {}: {}",
            marker(notification.variant),
            notification.title,
            notification.description
        );
        {
            let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(error) = writeln!(out, "{line}").and_then(|()| out.flush()) {
                warn!(%error, "failed to write notification");
            }
        }
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    dismissed: usize,
    route: Option<Route>,
}

/// Form surface for one-shot commands; records what the workflow asked for.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    state: Mutex<SurfaceState>,
}

impl TerminalSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the form was dismissed.
    #[must_use]
    pub fn dismissed(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dismissed
    }

    /// The last navigation request.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).route
    }
}

impl FormSurface for TerminalSurface {
    fn dismiss(&self) {
        info!("form dismissed");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dismissed += 1;
    }

    fn navigate(&self, route: Route) {
        info!(path = route.path(), "navigation requested");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .route = Some(route);
    }
}
