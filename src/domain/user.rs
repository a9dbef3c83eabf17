//! User domain model.

use super::id::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role reported by the backend.
///
/// Unknown roles are kept verbatim so that a newer backend does not break
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    #[default]
    Patient,
    Doctor,
    Other(String),
}

impl UserType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for UserType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Patient" => Self::Patient,
            "Doctor" => Self::Doctor,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for UserType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<UserType> for String {
    fn from(value: UserType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and profile fields of a user account.
///
/// The login endpoint and the user directory spell some fields differently,
/// so the aliases accept both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,

    #[serde(default, alias = "fullName", alias = "FullName")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub address: String,

    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,

    #[serde(default)]
    pub user_type: UserType,
}
