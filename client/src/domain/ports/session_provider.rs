//! Port for resolving the currently authenticated user.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::AuthUser;

define_port_error! {
    /// Errors raised while resolving the session.
    pub enum SessionError {
        /// Nobody is signed in.
        Missing => "no authenticated session",
        /// The session could not be looked up.
        Lookup { message: String } => "session lookup failed: {message}",
    }
}

/// Resolves the signed-in user for workflows that write on their behalf.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Return the current user, failing when there is none.
    async fn current_user(&self) -> Result<AuthUser, SessionError>;
}
