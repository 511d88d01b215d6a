//! Port for user-facing toast notifications.

use serde::Serialize;

/// Visual treatment of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    /// Neutral confirmation.
    #[default]
    Default,
    /// Informational outcome that is neither success nor failure.
    Info,
    /// Failure the user must notice.
    Destructive,
}

/// A dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    /// A neutral notification.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_variant(title, description, NotificationVariant::Default)
    }

    /// An informational notification.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_variant(title, description, NotificationVariant::Info)
    }

    /// A destructive notification.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_variant(title, description, NotificationVariant::Destructive)
    }

    fn with_variant(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: NotificationVariant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    /// Whether this notification reports a failure.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Shows notifications to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Display one notification.
    fn notify(&self, notification: Notification);
}

/// Notifier that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotifier;

impl Notifier for FixtureNotifier {
    fn notify(&self, _notification: Notification) {}
}
