//! Application context: root state, dispatch and the credential cache.
//!
//! A [`Store`] is created once at startup and passed to whatever needs it.
//! Dispatch runs the pending transition, awaits the worker, then runs the
//! fulfilled or rejected transition; each transition is applied atomically and
//! published to subscribers. Operations on different slices may settle in any
//! order.

use super::slices::RequestId;
use super::state::RootState;
use crate::domain::error::Result;
use crate::domain::{Credential, User, ValidationError};
use crate::storage::CredentialStore;
use crate::worker::{Operation, Outcome, Worker};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tracing::Instrument;

const LOGIN_NOT_PERSISTED: &str = "Login failed";

/// Why a dispatched operation did not fulfill.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Rejected client-side; nothing was sent and no state changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation went through pending and ended rejected.
    #[error("{0}")]
    Rejected(String),
}

impl DispatchError {
    /// The single message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

struct Inner {
    state: watch::Sender<RootState>,
    worker: Worker,
    credentials: Mutex<Box<dyn CredentialStore>>,
    next_request: AtomicU64,
}

/// Shared handle to the application context.
///
/// Cloning is cheap; clones share state, worker and credential cache.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    #[must_use]
    pub fn new(worker: Worker, credentials: Box<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(RootState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                worker,
                credentials: Mutex::new(credentials),
                next_request: AtomicU64::new(0),
            }),
        }
    }

    /// Copy of the current state tree.
    #[must_use]
    pub fn snapshot(&self) -> RootState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.inner.state.subscribe()
    }

    /// The cached credential; a cache that cannot be read counts as signed out.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        match self.credentials().load() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "credential cache unreadable, treating as signed out");
                None
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Validates and runs `operation`, resolving to its fulfilled payload.
    ///
    /// A successful login also caches the credential before the fulfilled
    /// transition is applied.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Validation`] if a client-side check failed (no
    /// request, no state change), [`DispatchError::Rejected`] with the
    /// normalized message otherwise.
    pub async fn dispatch(&self, operation: Operation) -> std::result::Result<Outcome, DispatchError> {
        let credential = self.credential();
        let operation = operation.validated(credential.as_ref()).map_err(|e| {
            tracing::debug!(error = %e, "operation failed validation");
            DispatchError::Validation(e)
        })?;

        let request = RequestId(self.inner.next_request.fetch_add(1, Ordering::Relaxed) + 1);
        let span = tracing::debug_span!("dispatch", operation = operation.name(), %request);

        async {
            self.inner
                .state
                .send_modify(|state| state.begin(request, &operation));

            let result = match self.inner.worker.execute(&operation, credential.as_ref()).await {
                Ok(Outcome::LoggedIn { token, user }) => self.remember(token, user),
                other => other,
            };

            match result {
                Ok(outcome) => {
                    self.inner
                        .state
                        .send_modify(|state| state.fulfill(request, &operation, &outcome));
                    tracing::debug!("operation fulfilled");
                    Ok(outcome)
                }
                Err(error) => {
                    self.inner
                        .state
                        .send_modify(|state| state.reject(request, &operation, &error.message));
                    tracing::debug!(error = %error, "operation rejected");
                    Err(DispatchError::Rejected(error.message))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Signs out: clears the login slice and removes the cached credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache removal could not be persisted. The
    /// in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<()> {
        self.inner.state.send_modify(|state| state.login.logout());
        let result = self.credentials().clear();
        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to clear credential cache");
        } else {
            tracing::debug!("logged out");
        }
        result
    }

    fn remember(
        &self,
        token: String,
        user: User,
    ) -> std::result::Result<Outcome, crate::api::ApiError> {
        let credential = Credential::new(token.clone(), user.id.clone(), user.user_type.clone());
        if let Err(e) = self.credentials().save(&credential) {
            tracing::error!(error = %e, "failed to cache credential after login");
            return Err(crate::api::ApiError::new(LOGIN_NOT_PERSISTED));
        }
        Ok(Outcome::LoggedIn { token, user })
    }

    fn credentials(&self) -> MutexGuard<'_, Box<dyn CredentialStore>> {
        self.inner
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("worker", &self.inner.worker)
            .field("next_request", &self.inner.next_request)
            .finish_non_exhaustive()
    }
}
