//! Project records and the payloads used to create them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Profile, ProjectId, UserId};

/// Error returned when a stage or commitment string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariantError {
    /// Which enumeration failed to parse.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Maturity of a project. Transitions between stages are unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStage {
    /// Nothing built yet.
    #[default]
    Idea,
    /// Under active development.
    Development,
    /// Live with users.
    Launched,
}

impl ProjectStage {
    /// Wire spelling stored in the `projects.stage` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Development => "development",
            Self::Launched => "launched",
        }
    }

    /// Capitalised label shown on cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idea => "Idea",
            Self::Development => "Development",
            Self::Launched => "Launched",
        }
    }
}

impl fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStage {
    type Err = UnknownVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "idea" => Ok(Self::Idea),
            "development" => Ok(Self::Development),
            "launched" => Ok(Self::Launched),
            other => Err(UnknownVariantError {
                kind: "project stage",
                value: other.to_owned(),
            }),
        }
    }
}

/// A `projects` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Primary key.
    pub id: ProjectId,
    /// Project name.
    pub title: String,
    /// Free text pitch.
    pub description: String,
    /// Free text category, e.g. "Fintech".
    pub category: String,
    /// Current stage.
    pub stage: ProjectStage,
    /// User who created the project.
    pub creator_id: UserId,
    /// Team size as maintained by the data service.
    pub team_size: u32,
    /// Creation timestamp assigned by the data service.
    pub created_at: DateTime<Utc>,
}

/// Validated project form values, ready to be attached to a creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Project name, at least three characters.
    pub title: String,
    /// Pitch, at least twenty characters.
    pub description: String,
    /// Non-empty category.
    pub category: String,
    /// Selected stage.
    pub stage: ProjectStage,
}

impl ProjectDraft {
    /// Attach the creating user, producing the insert payload.
    #[must_use]
    pub fn into_new_project(self, creator_id: UserId) -> NewProject {
        NewProject {
            title: self.title,
            description: self.description,
            category: self.category,
            stage: self.stage,
            creator_id,
        }
    }
}

/// Insert payload for the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Project name.
    pub title: String,
    /// Pitch.
    pub description: String,
    /// Category.
    pub category: String,
    /// Stage.
    pub stage: ProjectStage,
    /// Creating user.
    pub creator_id: UserId,
}

/// Filter applied when listing projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Restrict to projects created by this user; `None` lists every project.
    pub creator_id: Option<UserId>,
}

impl ProjectFilter {
    /// List every project.
    #[must_use]
    pub const fn all() -> Self {
        Self { creator_id: None }
    }

    /// List projects created by `creator_id`.
    #[must_use]
    pub const fn created_by(creator_id: UserId) -> Self {
        Self {
            creator_id: Some(creator_id),
        }
    }
}

/// A project joined with the number of roles attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectWithRoleCount {
    /// The project row.
    pub project: Project,
    /// Count of `roles` rows referencing the project.
    pub role_count: u32,
}

/// A project joined with its owner's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectWithOwner {
    /// The project row.
    pub project: Project,
    /// Profile of the creator, when one exists.
    pub owner: Option<Profile>,
}
