//! Dashboard and explore loaders.
//!
//! Both reshape project rows into [`ProjectSummary`] cards. The dashboard is
//! keyed by the signed-in user and reads two branches: projects the user
//! created and projects the user applied to. Explore lists every project.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::ports::{ApplicationRepository, BackendError, Notification, Notifier, ProjectRepository};
use super::reactive::{FetchTicket, LoadStatus, ReactiveView};
use super::{
    ApplicationStatus, ApplicationWithProject, ProjectFilter, ProjectId, ProjectStage,
    ProjectWithRoleCount, UserId,
};

/// Notification title when the dashboard cannot be read.
pub const DASHBOARD_LOAD_FAILED: &str = "Error loading dashboard";
/// Notification title when the explore list cannot be read.
pub const PROJECTS_LOAD_FAILED: &str = "Error loading projects";

/// Card-sized view of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub open_roles: u32,
    pub team_size: u32,
    pub stage: ProjectStage,
    pub created_at: DateTime<Utc>,
}

impl From<ProjectWithRoleCount> for ProjectSummary {
    fn from(value: ProjectWithRoleCount) -> Self {
        let ProjectWithRoleCount {
            project,
            role_count,
        } = value;
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            category: project.category,
            open_roles: role_count,
            team_size: project.team_size,
            stage: project.stage,
            created_at: project.created_at,
        }
    }
}

impl From<&ApplicationWithProject> for ProjectSummary {
    /// Applied-to projects carry no role count.
    fn from(value: &ApplicationWithProject) -> Self {
        let project = &value.project;
        Self {
            id: project.id,
            title: project.title.clone(),
            description: project.description.clone(),
            category: project.category.clone(),
            open_roles: 0,
            team_size: project.team_size,
            stage: project.stage,
            created_at: project.created_at,
        }
    }
}

/// One row of the dashboard's recent activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub project: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub date: DateTime<Utc>,
}

impl From<&ApplicationWithProject> for ActivityItem {
    fn from(value: &ApplicationWithProject) -> Self {
        Self {
            project: value.project.title.clone(),
            role: value.role.title.clone(),
            status: value.application.status,
            date: value.application.created_at,
        }
    }
}

/// Maximum entries in the recent activity list.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub my_projects: Vec<ProjectSummary>,
    pub applied_projects: Vec<ProjectSummary>,
    pub recent_activity: Vec<ActivityItem>,
}

impl DashboardView {
    /// Sum of open roles across the user's own projects.
    #[must_use]
    pub fn open_roles_total(&self) -> u32 {
        self.my_projects.iter().map(|p| p.open_roles).sum()
    }

    /// Number of applications the user has sent.
    #[must_use]
    pub const fn application_count(&self) -> usize {
        self.applied_projects.len()
    }
}

/// Loads the dashboard for the signed-in user.
pub struct DashboardLoader<P, A> {
    projects: Arc<P>,
    applications: Arc<A>,
    notifier: Arc<dyn Notifier>,
    state: ReactiveView<UserId, DashboardView>,
}

impl<P, A> DashboardLoader<P, A>
where
    P: ProjectRepository,
    A: ApplicationRepository,
{
    #[must_use]
    pub fn new(projects: Arc<P>, applications: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            projects,
            applications,
            notifier,
            state: ReactiveView::new(),
        }
    }

    /// Load for `user`, fetching only when the user changed.
    ///
    /// Does nothing while no user is signed in. A user change during a
    /// fetch starts a new fetch; the older one returns
    /// [`LoadStatus::Superseded`] without touching the view.
    pub async fn load(&self, user: Option<UserId>) -> LoadStatus {
        let Some(user_id) = user else {
            return LoadStatus::Skipped;
        };
        match self.state.begin(&user_id) {
            Ok(ticket) => self.fetch_into_state(&ticket).await,
            Err(status) => status,
        }
    }

    /// Re-fetch for the user already loaded.
    pub async fn refresh(&self) -> LoadStatus {
        match self.state.begin_refresh() {
            Ok(ticket) => self.fetch_into_state(&ticket).await,
            Err(status) => status,
        }
    }

    async fn fetch_into_state(&self, ticket: &FetchTicket<'_, UserId, DashboardView>) -> LoadStatus {
        let user_id = *ticket.dependency();
        match self.fetch(&user_id).await {
            Ok(view) => {
                let my_projects = view.my_projects.len();
                let applied_projects = view.applied_projects.len();
                if !self.state.commit(ticket, view) {
                    debug!(%user_id, "dashboard result superseded");
                    return LoadStatus::Superseded;
                }
                debug!(%user_id, my_projects, applied_projects, "dashboard loaded");
                LoadStatus::Loaded
            }
            Err(error) => {
                warn!(%user_id, kind = error.kind(), message = error.message(), "dashboard load failed");
                if !self.state.clear(ticket) {
                    return LoadStatus::Superseded;
                }
                self.notifier
                    .notify(Notification::error(DASHBOARD_LOAD_FAILED, error.message()));
                LoadStatus::Failed
            }
        }
    }

    async fn fetch(&self, user_id: &UserId) -> Result<DashboardView, BackendError> {
        let own = self
            .projects
            .list_projects(ProjectFilter::created_by(*user_id))
            .await?;
        let applied = self
            .applications
            .list_applications_for_applicant(user_id)
            .await?;

        Ok(DashboardView {
            my_projects: own.into_iter().map(ProjectSummary::from).collect(),
            applied_projects: applied.iter().map(ProjectSummary::from).collect(),
            recent_activity: applied
                .iter()
                .take(RECENT_ACTIVITY_LIMIT)
                .map(ActivityItem::from)
                .collect(),
        })
    }

    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.state.view()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

/// Loads the public list of every project.
pub struct ExploreLoader<P> {
    projects: Arc<P>,
    notifier: Arc<dyn Notifier>,
    state: ReactiveView<(), Vec<ProjectSummary>>,
}

impl<P> ExploreLoader<P>
where
    P: ProjectRepository,
{
    #[must_use]
    pub fn new(projects: Arc<P>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            projects,
            notifier,
            state: ReactiveView::new(),
        }
    }

    /// Load once on mount; later calls are no-ops until [`Self::refresh`].
    pub async fn load(&self) -> LoadStatus {
        match self.state.begin(&()) {
            Ok(ticket) => self.fetch_into_state(&ticket).await,
            Err(status) => status,
        }
    }

    /// Re-fetch the list already loaded.
    pub async fn refresh(&self) -> LoadStatus {
        match self.state.begin_refresh() {
            Ok(ticket) => self.fetch_into_state(&ticket).await,
            Err(status) => status,
        }
    }

    async fn fetch_into_state(&self, ticket: &FetchTicket<'_, (), Vec<ProjectSummary>>) -> LoadStatus {
        match self.projects.list_projects(ProjectFilter::all()).await {
            Ok(rows) => {
                let count = rows.len();
                if !self
                    .state
                    .commit(ticket, rows.into_iter().map(ProjectSummary::from).collect())
                {
                    return LoadStatus::Superseded;
                }
                debug!(count, "explore projects loaded");
                LoadStatus::Loaded
            }
            Err(error) => {
                warn!(kind = error.kind(), message = error.message(), "explore load failed");
                if !self.state.clear(ticket) {
                    return LoadStatus::Superseded;
                }
                self.notifier
                    .notify(Notification::error(PROJECTS_LOAD_FAILED, error.message()));
                LoadStatus::Failed
            }
        }
    }

    #[must_use]
    pub fn projects(&self) -> Vec<ProjectSummary> {
        self.state.view()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}
