//! Cached session credential.

use super::id::UserId;
use super::user::UserType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token and identifiers that represent an authenticated session.
///
/// Present after a successful login, absent after logout. `Debug` never prints
/// the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub user_id: UserId,
    pub user_type: UserType,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: UserId, user_type: UserType) -> Self {
        Self {
            token: token.into(),
            user_id,
            user_type,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("user_type", &self.user_type)
            .finish()
    }
}

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
