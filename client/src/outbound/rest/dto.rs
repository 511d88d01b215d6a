//! Wire DTOs for the hosted REST endpoints.
//!
//! Rows are decoded into these snake_case DTOs first and then mapped into
//! domain records in one pass. Enumerations arrive as free text and are
//! parsed here, so an unexpected value becomes a decode error rather than a
//! panic further in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationWithProject, AuthUser,
    NewApplication, NewProject, NewRole, Profile, Project, ProjectId, ProjectMember,
    ProjectWithOwner, ProjectWithRoleCount, Role, RoleId, UserId,
};

#[derive(Debug, Deserialize)]
pub(super) struct ProfileRow {
    id: UserId,
    full_name: Option<String>,
    avatar_url: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            username: row.username,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CountRow {
    count: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProjectRow {
    id: ProjectId,
    title: String,
    description: String,
    category: String,
    stage: String,
    creator_id: UserId,
    team_size: i64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    roles: Vec<CountRow>,
    #[serde(default)]
    profiles: Option<ProfileRow>,
}

impl ProjectRow {
    fn into_project(self) -> Result<(Project, Vec<CountRow>, Option<ProfileRow>), String> {
        let stage = self.stage.parse().map_err(|err| format!("project {}: {err}", self.id))?;
        let team_size = u32::try_from(self.team_size)
            .map_err(|_| format!("project {}: team_size {} out of range", self.id, self.team_size))?;
        Ok((
            Project {
                id: self.id,
                title: self.title,
                description: self.description,
                category: self.category,
                stage,
                creator_id: self.creator_id,
                team_size,
                created_at: self.created_at,
            },
            self.roles,
            self.profiles,
        ))
    }

    pub(super) fn into_domain(self) -> Result<Project, String> {
        self.into_project().map(|(project, _, _)| project)
    }

    pub(super) fn into_with_role_count(self) -> Result<ProjectWithRoleCount, String> {
        let (project, counts, _) = self.into_project()?;
        let total: i64 = counts.iter().map(|row| row.count).sum();
        let role_count = u32::try_from(total)
            .map_err(|_| format!("project {}: role count {total} out of range", project.id))?;
        Ok(ProjectWithRoleCount {
            project,
            role_count,
        })
    }

    pub(super) fn into_with_owner(self) -> Result<ProjectWithOwner, String> {
        let (project, _, owner) = self.into_project()?;
        Ok(ProjectWithOwner {
            project,
            owner: owner.map(Profile::from),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleRow {
    id: RoleId,
    project_id: ProjectId,
    creator_id: UserId,
    title: String,
    description: String,
    #[serde(default)]
    skills: Vec<String>,
    commitment: String,
    remote: bool,
    created_at: DateTime<Utc>,
    #[serde(default)]
    projects: Option<ProjectRow>,
}

impl RoleRow {
    pub(super) fn into_domain(self) -> Result<Role, String> {
        let commitment = self
            .commitment
            .parse()
            .map_err(|err| format!("role {}: {err}", self.id))?;
        Ok(Role {
            id: self.id,
            project_id: self.project_id,
            creator_id: self.creator_id,
            title: self.title,
            description: self.description,
            skills: self.skills,
            commitment,
            remote: self.remote,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApplicationRow {
    id: ApplicationId,
    role_id: RoleId,
    applicant_id: UserId,
    experience: String,
    motivation: String,
    portfolio: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    roles: Option<RoleRow>,
}

impl ApplicationRow {
    pub(super) fn into_domain(self) -> Result<Application, String> {
        self.into_parts().map(|(application, _)| application)
    }

    fn into_parts(self) -> Result<(Application, Option<RoleRow>), String> {
        let status: ApplicationStatus = self
            .status
            .parse()
            .map_err(|err| format!("application {}: {err}", self.id))?;
        Ok((
            Application {
                id: self.id,
                role_id: self.role_id,
                applicant_id: self.applicant_id,
                experience: self.experience,
                motivation: self.motivation,
                portfolio: self.portfolio,
                contact_phone: self.contact_phone,
                contact_email: self.contact_email.unwrap_or_default(),
                status,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.roles,
        ))
    }

    /// Rows whose role or project was not visible are dropped.
    pub(super) fn into_with_project(self) -> Result<Option<ApplicationWithProject>, String> {
        let (application, role_row) = self.into_parts()?;
        let Some(mut role_row) = role_row else {
            return Ok(None);
        };
        let Some(project_row) = role_row.projects.take() else {
            return Ok(None);
        };
        Ok(Some(ApplicationWithProject {
            application,
            role: role_row.into_domain()?,
            project: project_row.into_domain()?,
        }))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MemberRow {
    project_id: ProjectId,
    user_id: UserId,
    role: String,
    joined_at: DateTime<Utc>,
    #[serde(default)]
    profiles: Option<ProfileRow>,
}

impl From<MemberRow> for ProjectMember {
    fn from(row: MemberRow) -> Self {
        Self {
            project_id: row.project_id,
            user_id: row.user_id,
            role: row.role,
            joined_at: row.joined_at,
            profile: row.profiles.map(Profile::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

impl From<AuthUserDto> for AuthUser {
    fn from(dto: AuthUserDto) -> Self {
        Self::new(dto.id, dto.email)
    }
}

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ServiceErrorDto {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default, alias = "error_description", alias = "msg")]
    pub(super) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct InsertProjectDto<'a> {
    title: &'a str,
    description: &'a str,
    category: &'a str,
    stage: &'static str,
    creator_id: UserId,
}

impl<'a> From<&'a NewProject> for InsertProjectDto<'a> {
    fn from(project: &'a NewProject) -> Self {
        Self {
            title: &project.title,
            description: &project.description,
            category: &project.category,
            stage: project.stage.as_str(),
            creator_id: project.creator_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct InsertRoleDto<'a> {
    project_id: ProjectId,
    creator_id: UserId,
    title: &'a str,
    description: &'a str,
    skills: &'a [String],
    commitment: &'static str,
    remote: bool,
}

impl<'a> From<&'a NewRole> for InsertRoleDto<'a> {
    fn from(role: &'a NewRole) -> Self {
        Self {
            project_id: role.project_id,
            creator_id: role.creator_id,
            title: &role.title,
            description: &role.description,
            skills: &role.skills,
            commitment: role.commitment.as_str(),
            remote: role.remote,
        }
    }
}

/// Blank optional fields are sent as JSON `null`.
#[derive(Debug, Serialize)]
pub(super) struct InsertApplicationDto<'a> {
    role_id: RoleId,
    applicant_id: UserId,
    experience: &'a str,
    motivation: &'a str,
    portfolio: Option<&'a str>,
    contact_phone: Option<&'a str>,
    contact_email: &'a str,
    status: &'static str,
}

impl<'a> From<&'a NewApplication> for InsertApplicationDto<'a> {
    fn from(application: &'a NewApplication) -> Self {
        Self {
            role_id: application.role_id,
            applicant_id: application.applicant_id,
            experience: &application.experience,
            motivation: &application.motivation,
            portfolio: application.portfolio.as_deref(),
            contact_phone: application.contact_phone.as_deref(),
            contact_email: &application.contact_email,
            status: application.status.as_str(),
        }
    }
}
