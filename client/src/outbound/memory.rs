//! In-memory backend implementing every repository port.
//!
//! Rows live in plain vectors behind one mutex that is never held across an
//! `.await`. Inserts assign ids and timestamps from the injected clock, check
//! the foreign keys the hosted service enforces, and append to a write log
//! so tests can assert exactly which writes happened. Failures can be
//! injected per table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{
    ApplicationRepository, BackendError, MemberRepository, ProjectRepository, RoleRepository,
};
use crate::domain::{
    Application, ApplicationId, ApplicationWithProject, NewApplication, NewProject, NewRole,
    Profile, Project, ProjectFilter, ProjectId, ProjectMember, ProjectWithOwner,
    ProjectWithRoleCount, Role, RoleId, UserId,
};

/// Tables of the hosted schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Profiles,
    Projects,
    Roles,
    Applications,
    ProjectMembers,
}

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Projects => "projects",
            Self::Roles => "roles",
            Self::Applications => "applications",
            Self::ProjectMembers => "project_members",
        }
    }
}

/// One successful insert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteRecord {
    Project(ProjectId),
    /// A bulk role insert; ids in request order.
    Roles(Vec<RoleId>),
    Application(ApplicationId),
}

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    projects: Vec<Project>,
    roles: Vec<Role>,
    applications: Vec<Application>,
    members: Vec<ProjectMember>,
    writes: Vec<WriteRecord>,
    failures: HashMap<Table, BackendError>,
}

impl Tables {
    fn check(&self, table: Table) -> Result<(), BackendError> {
        self.failures.get(&table).cloned().map_or(Ok(()), Err)
    }

    fn profile(&self, id: &UserId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.id == *id)
    }

    fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == *id)
    }

    fn role(&self, id: &RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == *id)
    }

    fn role_count(&self, project_id: &ProjectId) -> u32 {
        let count = self
            .roles
            .iter()
            .filter(|role| role.project_id == *project_id)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

fn foreign_key_violation(table: Table, column: &str) -> BackendError {
    BackendError::constraint(format!(
        "insert or update on table \"{table}\" violates foreign key constraint \"{table}_{column}_fkey\"",
        table = table.name(),
    ))
}

/// Backend double holding every table in memory.
pub struct InMemoryBackend {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryBackend {
    /// Empty backend stamping rows with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed_profile(&self, profile: Profile) {
        self.lock().profiles.push(profile);
    }

    pub fn seed_project(&self, project: Project) {
        self.lock().projects.push(project);
    }

    pub fn seed_role(&self, role: Role) {
        self.lock().roles.push(role);
    }

    pub fn seed_member(&self, member: ProjectMember) {
        self.lock().members.push(member);
    }

    pub fn seed_application(&self, application: Application) {
        self.lock().applications.push(application);
    }

    /// Make every request touching `table` fail with `error`.
    pub fn fail_table(&self, table: Table, error: BackendError) {
        self.lock().failures.insert(table, error);
    }

    /// Stop failing requests touching `table`.
    pub fn heal_table(&self, table: Table) {
        self.lock().failures.remove(&table);
    }

    /// Successful inserts, oldest first. Seeding is not recorded.
    #[must_use]
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        self.lock().projects.clone()
    }

    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.lock().roles.clone()
    }

    #[must_use]
    pub fn applications(&self) -> Vec<Application> {
        self.lock().applications.clone()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryBackend {
    async fn insert_project(&self, project: &NewProject) -> Result<Project, BackendError> {
        let mut tables = self.lock();
        tables.check(Table::Projects)?;
        let stored = Project {
            id: ProjectId::random(),
            title: project.title.clone(),
            description: project.description.clone(),
            category: project.category.clone(),
            stage: project.stage,
            creator_id: project.creator_id,
            team_size: 1,
            created_at: self.clock.utc(),
        };
        debug!(project_id = %stored.id, "in-memory project inserted");
        tables.projects.push(stored.clone());
        tables.writes.push(WriteRecord::Project(stored.id));
        Ok(stored)
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<ProjectWithRoleCount>, BackendError> {
        let tables = self.lock();
        tables.check(Table::Projects)?;
        let mut rows: Vec<ProjectWithRoleCount> = tables
            .projects
            .iter()
            .filter(|project| {
                filter
                    .creator_id
                    .is_none_or(|creator_id| project.creator_id == creator_id)
            })
            .map(|project| ProjectWithRoleCount {
                project: project.clone(),
                role_count: tables.role_count(&project.id),
            })
            .collect();
        rows.sort_by(|a, b| b.project.created_at.cmp(&a.project.created_at));
        Ok(rows)
    }

    async fn find_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<ProjectWithOwner>, BackendError> {
        let tables = self.lock();
        tables.check(Table::Projects)?;
        Ok(tables.project(project_id).map(|project| ProjectWithOwner {
            project: project.clone(),
            owner: tables.profile(&project.creator_id).cloned(),
        }))
    }
}

#[async_trait]
impl RoleRepository for InMemoryBackend {
    async fn insert_roles(&self, roles: &[NewRole]) -> Result<Vec<Role>, BackendError> {
        let mut tables = self.lock();
        tables.check(Table::Roles)?;
        if roles
            .iter()
            .any(|role| tables.project(&role.project_id).is_none())
        {
            return Err(foreign_key_violation(Table::Roles, "project_id"));
        }
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let now = self.clock.utc();
        let stored: Vec<Role> = roles
            .iter()
            .map(|role| Role {
                id: RoleId::random(),
                project_id: role.project_id,
                creator_id: role.creator_id,
                title: role.title.clone(),
                description: role.description.clone(),
                skills: role.skills.clone(),
                commitment: role.commitment,
                remote: role.remote,
                created_at: now,
            })
            .collect();
        debug!(count = stored.len(), "in-memory roles inserted");
        tables.roles.extend(stored.iter().cloned());
        tables
            .writes
            .push(WriteRecord::Roles(stored.iter().map(|role| role.id).collect()));
        Ok(stored)
    }

    async fn list_roles_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Role>, BackendError> {
        let tables = self.lock();
        tables.check(Table::Roles)?;
        let mut roles: Vec<Role> = tables
            .roles
            .iter()
            .filter(|role| role.project_id == *project_id)
            .cloned()
            .collect();
        roles.sort_by_key(|role| role.created_at);
        Ok(roles)
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryBackend {
    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<Application, BackendError> {
        let mut tables = self.lock();
        tables.check(Table::Applications)?;
        if tables.role(&application.role_id).is_none() {
            return Err(foreign_key_violation(Table::Applications, "role_id"));
        }
        let now = self.clock.utc();
        let stored = Application {
            id: ApplicationId::random(),
            role_id: application.role_id,
            applicant_id: application.applicant_id,
            experience: application.experience.clone(),
            motivation: application.motivation.clone(),
            portfolio: application.portfolio.clone(),
            contact_phone: application.contact_phone.clone(),
            contact_email: application.contact_email.clone(),
            status: application.status,
            created_at: now,
            updated_at: now,
        };
        debug!(application_id = %stored.id, "in-memory application inserted");
        tables.applications.push(stored.clone());
        tables.writes.push(WriteRecord::Application(stored.id));
        Ok(stored)
    }

    async fn list_applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<ApplicationWithProject>, BackendError> {
        let tables = self.lock();
        tables.check(Table::Applications)?;
        let mut rows: Vec<ApplicationWithProject> = tables
            .applications
            .iter()
            .filter(|application| application.applicant_id == *applicant_id)
            .filter_map(|application| {
                let role = tables.role(&application.role_id)?;
                let project = tables.project(&role.project_id)?;
                Some(ApplicationWithProject {
                    application: application.clone(),
                    role: role.clone(),
                    project: project.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.created_at.cmp(&a.application.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl MemberRepository for InMemoryBackend {
    async fn list_members(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectMember>, BackendError> {
        let tables = self.lock();
        tables.check(Table::ProjectMembers)?;
        Ok(tables
            .members
            .iter()
            .filter(|member| member.project_id == *project_id)
            .map(|member| ProjectMember {
                profile: tables.profile(&member.user_id).cloned(),
                ..member.clone()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests;
