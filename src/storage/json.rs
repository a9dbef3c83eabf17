//! JSON file credential cache.
//!
//! The credential is kept in a small versioned JSON document. Writes go to a
//! temporary sibling first and are renamed into place, so a crash never leaves
//! a half-written session file behind.

use crate::domain::error::{CancappError, Result};
use crate::domain::Credential;
use crate::storage::backend::CredentialStore;
use crate::storage::models::CredentialRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// Top-level document serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    /// Version of the file format for future migrations.
    version: u32,

    #[serde(default)]
    credential: Option<CredentialRecord>,
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            credential: None,
        }
    }
}

/// Credential cache backed by a JSON file.
///
/// The document is loaded once on creation and rewritten on every change.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "credential": {
///     "token": "eyJhbGciOi...",
///     "user_id": "17",
///     "user_type": "Patient",
///     "saved_at": 1735689600
///   }
/// }
/// ```
pub struct JsonCredentialStore {
    file_path: PathBuf,
    data: SessionFile,
}

impl JsonCredentialStore {
    /// Opens the cache at `file_path`, creating parent directories as needed.
    ///
    /// A missing file is an empty cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, or the file
    /// exists but cannot be read or parsed.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = match std::fs::read_to_string(&file_path) {
            Ok(contents) => parse_session(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionFile::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = ?file_path,
            version = data.version,
            signed_in = data.credential.is_some(),
            "credential cache opened"
        );
        Ok(Self { file_path, data })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Rewrites the whole document through a temporary sibling.
    fn persist(&self, document: &SessionFile) -> Result<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| CancappError::Storage(format!("failed to serialize session: {e}")))?;

        let staging = self.file_path.with_extension("json.partial");
        std::fs::write(&staging, json)?;
        std::fs::rename(&staging, &self.file_path)?;

        tracing::trace!(path = ?self.file_path, "session file written");
        Ok(())
    }
}

fn parse_session(contents: &str) -> Result<SessionFile> {
    let session: SessionFile = serde_json::from_str(contents)
        .map_err(|e| CancappError::Storage(format!("unreadable session file: {e}")))?;

    if session.version > FORMAT_VERSION {
        return Err(CancappError::Storage(format!(
            "session file version {} is newer than supported version {FORMAT_VERSION}",
            session.version
        )));
    }
    Ok(session)
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.data.credential.clone().map(Credential::from))
    }

    fn save(&mut self, credential: &Credential) -> Result<()> {
        let _span = tracing::debug_span!("json_save_credential",
            user_id = %credential.user_id
        )
        .entered();

        // Memory only changes once the file does.
        let next = SessionFile {
            credential: Some(CredentialRecord::from(credential)),
            ..self.data.clone()
        };
        self.persist(&next)?;
        self.data = next;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_credential").entered();

        if self.data.credential.take().is_none() && self.file_path.exists() {
            tracing::trace!("credential already absent");
            return Ok(());
        }
        self.persist(&self.data)
    }
}

impl std::fmt::Debug for JsonCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCredentialStore")
            .field("file_path", &self.file_path)
            .field("signed_in", &self.data.credential.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, UserType};
    use tempfile::TempDir;

    fn credential() -> Credential {
        Credential::new("tok-123", UserId::new("17"), UserType::Doctor)
    }

    #[test]
    fn credential_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = JsonCredentialStore::new(path.clone()).unwrap();
        store.save(&credential()).unwrap();
        drop(store);

        let reopened = JsonCredentialStore::new(path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(credential()));
    }

    #[test]
    fn clear_removes_all_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = JsonCredentialStore::new(path.clone()).unwrap();
        store.save(&credential()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("tok-123"));
        assert!(!raw.contains("Doctor"));
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonCredentialStore::new(path),
            Err(CancappError::Storage(_))
        ));
    }

    #[test]
    fn failed_write_keeps_previous_credential() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::create_dir(path.with_extension("json.partial")).unwrap();

        let mut store = JsonCredentialStore::new(path.clone()).unwrap();
        assert!(store.save(&credential()).is_err());
        assert_eq!(store.load().unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn no_temporary_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = JsonCredentialStore::new(path.clone()).unwrap();
        store.save(&credential()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.partial").exists());
    }
}
