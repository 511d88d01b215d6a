//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod application_repository;
mod backend_error;
mod form_surface;
mod member_repository;
mod notifier;
mod project_repository;
mod role_repository;
mod session_provider;

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::ApplicationRepository;
pub use backend_error::BackendError;
#[cfg(test)]
pub use form_surface::MockFormSurface;
pub use form_surface::{FixtureFormSurface, FormSurface, Route};
#[cfg(test)]
pub use member_repository::MockMemberRepository;
pub use member_repository::MemberRepository;
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{FixtureNotifier, Notification, NotificationVariant, Notifier};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::ProjectRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::RoleRepository;
#[cfg(test)]
pub use session_provider::MockSessionProvider;
pub use session_provider::{SessionError, SessionProvider};
