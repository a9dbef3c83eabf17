//! Credential cache abstraction.
//!
//! This module defines the [`CredentialStore`] trait that abstracts over where
//! the session credential lives between runs. The store and the route guard
//! only ever need three things: read it, replace it, forget it.

use crate::domain::error::Result;
use crate::domain::Credential;

/// Persistent home of the session credential.
///
/// # Implementations
///
/// - [`crate::storage::JsonCredentialStore`]: JSON file with atomic writes (default)
/// - [`crate::storage::MemoryCredentialStore`]: process-local, for tests and
///   one-shot sessions
///
/// # Examples
///
/// ```no_run
/// use cancapp::storage::{CredentialStore, JsonCredentialStore};
/// use std::path::PathBuf;
///
/// let store = JsonCredentialStore::new(PathBuf::from("/tmp/session.json"))?;
/// let signed_in = store.load()?.is_some();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait CredentialStore: Send {
    /// Returns the cached credential, or `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn load(&self) -> Result<Option<Credential>>;

    /// Replaces the cached credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the previous credential may then
    /// still be in place.
    fn save(&mut self, credential: &Credential) -> Result<()>;

    /// Removes the token, user id and user type together.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn clear(&mut self) -> Result<()>;
}
