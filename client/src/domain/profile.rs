//! Profiles and project membership, both read-only in this client.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProjectId, UserId};

/// Avatar text shown when a member has neither an avatar nor a name.
pub const PLACEHOLDER_INITIALS: &str = "UN";
/// Name shown when a profile has no full name.
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

/// A `profiles` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Same identifier as the authenticated user.
    pub id: UserId,
    /// Full name, if the user provided one.
    pub full_name: Option<String>,
    /// Stored avatar image URL.
    pub avatar_url: Option<String>,
    /// Optional handle.
    pub username: Option<String>,
}

impl Profile {
    /// Full name, falling back to [`UNKNOWN_USER_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_USER_NAME,
        }
    }

    /// Avatar to render for this profile.
    #[must_use]
    pub fn avatar(&self) -> Avatar {
        if let Some(url) = self.avatar_url.as_deref().filter(|url| !url.is_empty()) {
            return Avatar::Url(url.to_owned());
        }
        self.full_name
            .as_deref()
            .and_then(initials)
            .map_or_else(|| Avatar::Initials(PLACEHOLDER_INITIALS.to_owned()), Avatar::Initials)
    }
}

/// What to render in an avatar slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Avatar {
    /// Stored image URL.
    Url(String),
    /// One or two letters derived from the full name.
    Initials(String),
}

impl Avatar {
    /// The URL or the initials.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Url(value) | Self::Initials(value) => value.as_str(),
        }
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First character of the first and second whitespace-delimited tokens.
///
/// Returns `None` when the name has no tokens. Letter case is preserved.
#[must_use]
pub fn initials(full_name: &str) -> Option<String> {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next()?.chars().next()?;
    let mut result = String::from(first);
    if let Some(second) = tokens.next().and_then(|token| token.chars().next()) {
        result.push(second);
    }
    Some(result)
}

/// A `project_members` row joined with the member's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Project the member belongs to.
    pub project_id: ProjectId,
    /// Member user.
    pub user_id: UserId,
    /// Free text role label, e.g. "Founder".
    pub role: String,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
    /// Joined profile, absent when the profile row is missing.
    pub profile: Option<Profile>,
}
