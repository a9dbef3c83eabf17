//! In-memory credential cache.

use crate::domain::error::Result;
use crate::domain::Credential;
use crate::storage::backend::CredentialStore;

/// Keeps the credential for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Option<Credential>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.credential.clone())
    }

    fn save(&mut self, credential: &Credential) -> Result<()> {
        self.credential = Some(credential.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.credential = None;
        Ok(())
    }
}
