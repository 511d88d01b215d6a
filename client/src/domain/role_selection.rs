//! Choosing which role an application attaches to when none was picked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Role, UnknownVariantError};

/// Policy applied when an applicant applies to a project rather than a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleSelectionPolicy {
    /// The first role in the order the service returned them.
    #[default]
    FirstListed,
    /// The role with the newest `created_at`.
    MostRecent,
}

impl RoleSelectionPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstListed => "first-listed",
            Self::MostRecent => "most-recent",
        }
    }

    /// Pick a role from `roles`, or `None` when the list is empty.
    ///
    /// `MostRecent` keeps the earliest listed role among equal timestamps.
    #[must_use]
    pub fn select(self, roles: &[Role]) -> Option<&Role> {
        match self {
            Self::FirstListed => roles.first(),
            Self::MostRecent => roles.iter().fold(None, |best: Option<&Role>, role| match best {
                Some(current) if current.created_at >= role.created_at => Some(current),
                _ => Some(role),
            }),
        }
    }
}

impl fmt::Display for RoleSelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleSelectionPolicy {
    type Err = UnknownVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "first-listed" => Ok(Self::FirstListed),
            "most-recent" => Ok(Self::MostRecent),
            other => Err(UnknownVariantError {
                kind: "role selection policy",
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Commitment, ProjectId, RoleId, UserId};
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    fn role(title: &str, created_at: DateTime<Utc>) -> Role {
        Role {
            id: RoleId::random(),
            project_id: ProjectId::random(),
            creator_id: UserId::random(),
            title: title.to_owned(),
            description: "Builds the thing".to_owned(),
            skills: Vec::new(),
            commitment: Commitment::Flexible,
            remote: true,
            created_at,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(RoleSelectionPolicy::FirstListed, Some("Designer"))]
    #[case(RoleSelectionPolicy::MostRecent, Some("Engineer"))]
    fn selects_by_policy(#[case] policy: RoleSelectionPolicy, #[case] expected: Option<&str>) {
        let roles = vec![role("Designer", at(9)), role("Engineer", at(12)), role("PM", at(10))];
        assert_eq!(policy.select(&roles).map(|r| r.title.as_str()), expected);
    }

    #[rstest]
    #[case(RoleSelectionPolicy::FirstListed)]
    #[case(RoleSelectionPolicy::MostRecent)]
    fn empty_list_selects_nothing(#[case] policy: RoleSelectionPolicy) {
        assert!(policy.select(&[]).is_none());
    }

    #[rstest]
    fn most_recent_ties_keep_listing_order() {
        let roles = vec![role("First", at(9)), role("Second", at(9))];
        let chosen = RoleSelectionPolicy::MostRecent.select(&roles);
        assert_eq!(chosen.map(|r| r.title.as_str()), Some("First"));
    }

    #[rstest]
    #[case("first-listed", Ok(RoleSelectionPolicy::FirstListed))]
    #[case(" most-recent ", Ok(RoleSelectionPolicy::MostRecent))]
    #[case("random", Err(()))]
    fn parses_wire_spelling(#[case] raw: &str, #[case] expected: Result<RoleSelectionPolicy, ()>) {
        assert_eq!(raw.parse::<RoleSelectionPolicy>().map_err(|_| ()), expected);
    }
}
