//! Project details loader: header, roles, and team.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::ports::{
    BackendError, MemberRepository, Notification, Notifier, ProjectRepository, RoleRepository,
};
use super::reactive::{LoadStatus, ReactiveView};
use super::{
    Avatar, PLACEHOLDER_INITIALS, Profile, ProjectId, ProjectMember, ProjectStage, Role,
    UNKNOWN_USER_NAME, UserId,
};

/// Notification title when a project read fails.
pub const PROJECT_LOAD_FAILED: &str = "Error loading project";
/// Notification title when the project does not exist.
pub const PROJECT_NOT_FOUND: &str = "Project not found";
/// Notification body when the project does not exist.
pub const PROJECT_NOT_FOUND_DETAIL: &str =
    "The project you're looking for doesn't exist or has been removed.";

/// A team member card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub id: UserId,
    pub name: String,
    pub role: String,
    pub avatar: Avatar,
}

impl From<ProjectMember> for TeamMember {
    fn from(member: ProjectMember) -> Self {
        let (name, avatar) = member.profile.as_ref().map_or_else(
            || {
                (
                    UNKNOWN_USER_NAME.to_owned(),
                    Avatar::Initials(PLACEHOLDER_INITIALS.to_owned()),
                )
            },
            |profile| (profile.display_name().to_owned(), profile.avatar()),
        );
        Self {
            id: member.profile.as_ref().map_or(member.user_id, |p| p.id),
            name,
            role: member.role,
            avatar,
        }
    }
}

/// The project owner as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOwner {
    pub name: String,
    pub avatar: Avatar,
}

impl From<&Profile> for ProjectOwner {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.display_name().to_owned(),
            avatar: profile.avatar(),
        }
    }
}

/// Header fields of the project page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectHeader {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub stage: ProjectStage,
    pub team_size: u32,
    pub created_at: DateTime<Utc>,
    pub owner: Option<ProjectOwner>,
}

/// Everything the project page shows; `project` is `None` until loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectDetailsView {
    pub project: Option<ProjectHeader>,
    pub roles: Vec<Role>,
    pub team: Vec<TeamMember>,
}

impl ProjectDetailsView {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.project.is_none()
    }
}

enum FetchError {
    Missing,
    Backend(BackendError),
}

impl From<BackendError> for FetchError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

/// Loads one project page, keyed by the route's project id.
pub struct ProjectDetailsLoader<P, R, M> {
    projects: Arc<P>,
    roles: Arc<R>,
    members: Arc<M>,
    notifier: Arc<dyn Notifier>,
    state: ReactiveView<ProjectId, ProjectDetailsView>,
}

impl<P, R, M> ProjectDetailsLoader<P, R, M>
where
    P: ProjectRepository,
    R: RoleRepository,
    M: MemberRepository,
{
    #[must_use]
    pub fn new(
        projects: Arc<P>,
        roles: Arc<R>,
        members: Arc<M>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            projects,
            roles,
            members,
            notifier,
            state: ReactiveView::new(),
        }
    }

    /// Load the route's project, fetching only when the id changed.
    ///
    /// Does nothing when the route carries no id.
    pub async fn load(&self, route_project: Option<ProjectId>) -> LoadStatus {
        let Some(project_id) = route_project else {
            return LoadStatus::Skipped;
        };
        let ticket = match self.state.begin(&project_id) {
            Ok(ticket) => ticket,
            Err(status) => return status,
        };

        match self.fetch(&project_id).await {
            Ok(view) => {
                let roles = view.roles.len();
                let team = view.team.len();
                if !self.state.commit(&ticket, view) {
                    return LoadStatus::Superseded;
                }
                debug!(%project_id, roles, team, "project details loaded");
                LoadStatus::Loaded
            }
            Err(FetchError::Missing) => {
                debug!(%project_id, "project not found");
                if !self.state.clear(&ticket) {
                    return LoadStatus::Superseded;
                }
                self.notifier.notify(Notification::error(
                    PROJECT_NOT_FOUND,
                    PROJECT_NOT_FOUND_DETAIL,
                ));
                LoadStatus::NotFound
            }
            Err(FetchError::Backend(error)) => {
                warn!(
                    %project_id,
                    kind = error.kind(),
                    message = error.message(),
                    "project details load failed"
                );
                if !self.state.clear(&ticket) {
                    return LoadStatus::Superseded;
                }
                self.notifier
                    .notify(Notification::error(PROJECT_LOAD_FAILED, error.message()));
                LoadStatus::Failed
            }
        }
    }

    async fn fetch(&self, project_id: &ProjectId) -> Result<ProjectDetailsView, FetchError> {
        let found = self
            .projects
            .find_project(project_id)
            .await?
            .ok_or(FetchError::Missing)?;
        let roles = self.roles.list_roles_for_project(project_id).await?;
        let members = self.members.list_members(project_id).await?;

        let project = found.project;
        Ok(ProjectDetailsView {
            project: Some(ProjectHeader {
                id: project.id,
                title: project.title,
                description: project.description,
                category: project.category,
                stage: project.stage,
                team_size: project.team_size,
                created_at: project.created_at,
                owner: found.owner.as_ref().map(ProjectOwner::from),
            }),
            roles,
            team: members.into_iter().map(TeamMember::from).collect(),
        })
    }

    #[must_use]
    pub fn view(&self) -> ProjectDetailsView {
        self.state.view()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

#[cfg(test)]
mod tests;
