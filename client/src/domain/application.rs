//! Applications submitted against roles.
//!
//! The data service does not enforce uniqueness of `(applicant, role)`, so a
//! user may apply to the same role more than once.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApplicationId, Project, Role, RoleId, UnknownVariantError, UserId};

/// Review status of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Awaiting review. New applications always start here.
    #[default]
    Pending,
    /// Accepted by the project owner.
    Accepted,
    /// Declined by the project owner.
    Rejected,
}

impl ApplicationStatus {
    /// Wire spelling stored in the `applications.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariantError {
                kind: "application status",
                value: other.to_owned(),
            }),
        }
    }
}

/// An `applications` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Primary key.
    pub id: ApplicationId,
    /// Role applied for.
    pub role_id: RoleId,
    /// Applying user.
    pub applicant_id: UserId,
    /// Relevant experience.
    pub experience: String,
    /// Why the applicant is interested.
    pub motivation: String,
    /// Portfolio, LinkedIn, or GitHub link.
    pub portfolio: Option<String>,
    /// Contact phone number.
    pub contact_phone: Option<String>,
    /// Contact email address.
    pub contact_email: String,
    /// Review status.
    pub status: ApplicationStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated application form values. Blank optional fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    /// Relevant experience, at least ten characters.
    pub experience: String,
    /// Motivation, at least ten characters.
    pub motivation: String,
    /// Optional portfolio link.
    pub portfolio: Option<String>,
    /// Optional phone number.
    pub contact_phone: Option<String>,
    /// Contact email address.
    pub contact_email: String,
}

impl ApplicationDraft {
    /// Attach the resolved role and applicant, producing the insert payload.
    #[must_use]
    pub fn into_new_application(self, role_id: RoleId, applicant_id: UserId) -> NewApplication {
        NewApplication {
            role_id,
            applicant_id,
            experience: self.experience,
            motivation: self.motivation,
            portfolio: self.portfolio,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            status: ApplicationStatus::Pending,
        }
    }
}

/// Insert payload for the `applications` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    /// Resolved role.
    pub role_id: RoleId,
    /// Resolved applicant.
    pub applicant_id: UserId,
    /// Experience text.
    pub experience: String,
    /// Motivation text.
    pub motivation: String,
    /// Portfolio link or `None` (written as null).
    pub portfolio: Option<String>,
    /// Phone number or `None` (written as null).
    pub contact_phone: Option<String>,
    /// Contact email.
    pub contact_email: String,
    /// Initial status.
    pub status: ApplicationStatus,
}

/// An application joined through its role to the owning project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationWithProject {
    /// The application row.
    pub application: Application,
    /// The role applied for.
    pub role: Role,
    /// The project owning the role.
    pub project: Project,
}
