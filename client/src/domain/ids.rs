//! Strongly typed identifiers for records owned by the data service.
//!
//! Every table uses UUID primary keys. Wrapping them in distinct newtypes
//! keeps a role id from being passed where a project id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("{kind} must not be empty")]
    Empty {
        /// Human readable identifier kind, e.g. `project id`.
        kind: &'static str,
    },
    /// The identifier was not a valid UUID.
    #[error("{kind} must be a valid UUID")]
    Invalid {
        /// Human readable identifier kind, e.g. `project id`.
        kind: &'static str,
    },
}

macro_rules! define_id {
    ($(#[$outer:meta])* $name:ident => $kind:literal) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and construct the identifier from a string.
            ///
            /// # Errors
            ///
            /// Returns an [`IdValidationError`] when the input is blank,
            /// padded with whitespace, or not a UUID.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty { kind: $kind });
                }
                if raw.trim() != raw {
                    return Err(IdValidationError::Invalid { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::Invalid { kind: $kind })
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value)
            }
        }
    };
}

define_id! {
    /// Identifier of an authenticated user and of their `profiles` row.
    UserId => "user id"
}

define_id! {
    /// Identifier of a `projects` row.
    ProjectId => "project id"
}

define_id! {
    /// Identifier of a `roles` row.
    RoleId => "role id"
}

define_id! {
    /// Identifier of an `applications` row.
    ApplicationId => "application id"
}

#[cfg(test)]
mod tests {
    //! Identifier parsing coverage.

    use super::*;
    use rstest::rstest;

    const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[rstest]
    fn parses_valid_uuid() {
        let id = ProjectId::new(VALID_ID).expect("valid project id");
        assert_eq!(id.to_string(), VALID_ID);
    }

    #[rstest]
    #[case("", IdValidationError::Empty { kind: "role id" })]
    #[case("not-a-uuid", IdValidationError::Invalid { kind: "role id" })]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdValidationError::Invalid { kind: "role id" })]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(RoleId::new(raw), Err(expected));
    }

    #[rstest]
    fn serde_round_trips_through_strings() {
        let id = UserId::new(VALID_ID).expect("valid user id");
        let json = serde_json::to_string(&id).expect("serialise id");
        assert_eq!(json, format!("\"{VALID_ID}\""));
        let back: UserId = serde_json::from_str(&json).expect("deserialise id");
        assert_eq!(back, id);
    }
}
