//! Port for the `projects` table.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{
    NewProject, Project, ProjectFilter, ProjectId, ProjectWithOwner, ProjectWithRoleCount,
};

/// Reads and inserts against `projects`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert one project and return the stored row with its generated id.
    async fn insert_project(&self, project: &NewProject) -> Result<Project, BackendError>;

    /// List projects matching `filter`, newest first, each joined with the
    /// count of its roles.
    async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<ProjectWithRoleCount>, BackendError>;

    /// Fetch one project joined with its owner's profile.
    ///
    /// Returns `None` when no project has this id.
    async fn find_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<ProjectWithOwner>, BackendError>;
}
