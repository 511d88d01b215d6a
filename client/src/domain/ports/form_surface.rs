//! Port for the dialog or sheet hosting a form.

/// Navigation targets a workflow can request after success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The signed-in user's dashboard.
    Dashboard,
    /// The public project list.
    Explore,
}

impl Route {
    /// Path used by the router for this target.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Explore => "/explore",
        }
    }
}

/// The parent surface that owns a form.
///
/// Workflows call `dismiss` exactly once after a successful submission.
#[cfg_attr(test, mockall::automock)]
pub trait FormSurface: Send + Sync {
    /// Close the dialog hosting the form.
    fn dismiss(&self);

    /// Move to another page.
    fn navigate(&self, route: Route);
}

/// Surface that ignores dismissal and navigation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFormSurface;

impl FormSurface for FixtureFormSurface {
    fn dismiss(&self) {}

    fn navigate(&self, _route: Route) {}
}
