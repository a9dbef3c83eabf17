//! On-disk record for the credential cache.
//!
//! Kept separate from [`Credential`] so the file format can evolve without
//! touching the domain type.

use crate::domain::{Credential, UserId, UserType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub token: String,

    pub user_id: String,

    #[serde(default)]
    pub user_type: String,

    /// Unix timestamp of the login that produced this record.
    pub saved_at: i64,
}

impl From<&Credential> for CredentialRecord {
    fn from(credential: &Credential) -> Self {
        Self {
            token: credential.token.clone(),
            user_id: credential.user_id.to_string(),
            user_type: credential.user_type.to_string(),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

impl From<CredentialRecord> for Credential {
    fn from(record: CredentialRecord) -> Self {
        let user_type = if record.user_type.is_empty() {
            UserType::default()
        } else {
            UserType::from(record.user_type)
        };
        Self::new(record.token, UserId::new(record.user_id), user_type)
    }
}
