//! Port for the `roles` table.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{NewRole, ProjectId, Role};

/// Reads and bulk inserts against `roles`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Insert every role in one request.
    ///
    /// The write is all-or-nothing: a constraint failure on any row rejects
    /// the whole batch.
    async fn insert_roles(&self, roles: &[NewRole]) -> Result<Vec<Role>, BackendError>;

    /// List the roles of one project in the order the service returns them.
    async fn list_roles_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Role>, BackendError>;
}
