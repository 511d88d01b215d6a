//! Process-wide session context.
//!
//! The context caches the signed-in user once resolved and is handed to
//! workflows as a [`SessionProvider`]. It has an explicit lifecycle:
//! [`SessionContext::init`] or [`SessionContext::initialise`] on sign in and
//! [`SessionContext::sign_out`] on sign out.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::UserId;
use super::ports::{SessionError, SessionProvider};

/// The authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    #[must_use]
    pub const fn new(id: UserId, email: Option<String>) -> Self {
        Self { id, email }
    }
}

/// Shared, clonable holder of the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Arc<RwLock<Option<AuthUser>>>,
}

impl SessionContext {
    /// A context with nobody signed in.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A context already holding `user`.
    #[must_use]
    pub fn signed_in(user: AuthUser) -> Self {
        let context = Self::default();
        context.init(user);
        context
    }

    /// Record `user` as signed in.
    pub fn init(&self, user: AuthUser) {
        debug!(user_id = %user.id, "session initialised");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Resolve the user through `provider` and cache the result.
    ///
    /// A missing session clears the cache; a lookup failure leaves it as is.
    pub async fn initialise(&self, provider: &dyn SessionProvider) -> Result<AuthUser, SessionError> {
        match provider.current_user().await {
            Ok(user) => {
                self.init(user.clone());
                Ok(user)
            }
            Err(SessionError::Missing) => {
                self.sign_out();
                Err(SessionError::Missing)
            }
            Err(err) => Err(err),
        }
    }

    /// Forget the current user.
    pub fn sign_out(&self) {
        debug!("session cleared");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The cached user, if any.
    #[must_use]
    pub fn current(&self) -> Option<AuthUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The cached user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.current().map(|user| user.id)
    }
}

#[async_trait]
impl SessionProvider for SessionContext {
    async fn current_user(&self) -> Result<AuthUser, SessionError> {
        self.current().ok_or(SessionError::Missing)
    }
}
