//! Open positions attached to a project.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProjectId, RoleId, UnknownVariantError, UserId};

/// Expected time commitment for a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Commitment {
    /// Full-time engagement.
    FullTime,
    /// Part-time engagement.
    PartTime,
    /// Negotiable.
    #[default]
    Flexible,
}

impl Commitment {
    /// Wire spelling stored in the `roles.commitment` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Flexible => "flexible",
        }
    }

    /// Badge label with the hyphen replaced by a space.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "full time",
            Self::PartTime => "part time",
            Self::Flexible => "flexible",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = UnknownVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "full-time" => Ok(Self::FullTime),
            "part-time" => Ok(Self::PartTime),
            "flexible" => Ok(Self::Flexible),
            other => Err(UnknownVariantError {
                kind: "commitment",
                value: other.to_owned(),
            }),
        }
    }
}

/// A `roles` row. A role always belongs to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Primary key.
    pub id: RoleId,
    /// Parent project.
    pub project_id: ProjectId,
    /// User who posted the role.
    pub creator_id: UserId,
    /// Role title, e.g. "Frontend Developer".
    pub title: String,
    /// Description of the work.
    pub description: String,
    /// Ordered skill tags.
    pub skills: Vec<String>,
    /// Time commitment.
    pub commitment: Commitment,
    /// Whether the role can be done remotely.
    pub remote: bool,
    /// Creation timestamp assigned by the data service.
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// "Remote" or "On-site" badge text.
    #[must_use]
    pub const fn location_label(&self) -> &'static str {
        if self.remote { "Remote" } else { "On-site" }
    }
}

/// Validated role form values held by the project form until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    /// Role title.
    pub title: String,
    /// Description, at least ten characters.
    pub description: String,
    /// Normalised skill list.
    pub skills: Vec<String>,
    /// Time commitment.
    pub commitment: Commitment,
    /// Remote flag.
    pub remote: bool,
}

impl RoleDraft {
    /// Attach the parent project and creator, producing the insert payload.
    #[must_use]
    pub fn to_new_role(&self, project_id: ProjectId, creator_id: UserId) -> NewRole {
        NewRole {
            project_id,
            creator_id,
            title: self.title.clone(),
            description: self.description.clone(),
            skills: self.skills.clone(),
            commitment: self.commitment,
            remote: self.remote,
        }
    }
}

/// Insert payload for the `roles` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Parent project.
    pub project_id: ProjectId,
    /// Creating user.
    pub creator_id: UserId,
    /// Role title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Skill tags.
    pub skills: Vec<String>,
    /// Time commitment.
    pub commitment: Commitment,
    /// Remote flag.
    pub remote: bool,
}
