//! Port for the read-only `project_members` table.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{ProjectId, ProjectMember};

/// Reads `project_members` joined with `profiles`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// List the members of one project.
    async fn list_members(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectMember>, BackendError>;
}
