//! Feature state slices.
//!
//! Each slice owns one region of the root state and reacts to the operations
//! it owns through three transitions:
//!
//! - **pending**: sets `loading`, clears the previous error
//! - **fulfilled**: clears `loading`, merges the payload
//! - **rejected**: clears `loading`, stores the error message; data untouched
//!
//! `loading` is shared by every operation of a slice (last transition wins).
//! Callers that need per-request state read [`SliceStatus::request`], which
//! tracks each dispatched request individually.

pub mod auth;
pub mod comments;
pub mod login;
pub mod posts;
pub mod profile;

use crate::worker::{Operation, Outcome};
use std::collections::BTreeMap;
use std::fmt;

pub use auth::AuthState;
pub use comments::CommentsState;
pub use login::LoginState;
pub use posts::PostsState;
pub use profile::ProfileState;

/// Settled requests kept per slice before the oldest are forgotten.
const SETTLED_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SliceName {
    Auth,
    Login,
    Posts,
    Comments,
    Profile,
}

impl fmt::Display for SliceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auth => "auth",
            Self::Login => "login",
            Self::Posts => "posts",
            Self::Comments => "comment",
            Self::Profile => "profile",
        })
    }
}

/// Identifies one dispatch; allocated in increasing order by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Rejected(String),
}

impl RequestStatus {
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Loading and error bookkeeping shared by every slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceStatus {
    pub loading: bool,
    pub error: Option<String>,
    requests: BTreeMap<RequestId, RequestStatus>,
}

impl SliceStatus {
    pub fn begin(&mut self, request: RequestId) {
        self.loading = true;
        self.error = None;
        self.requests.insert(request, RequestStatus::Pending);
    }

    pub fn fulfill(&mut self, request: RequestId) {
        self.loading = false;
        self.requests.insert(request, RequestStatus::Fulfilled);
        self.forget_old();
    }

    pub fn reject(&mut self, request: RequestId, message: &str) {
        self.loading = false;
        self.error = Some(message.to_string());
        self.requests
            .insert(request, RequestStatus::Rejected(message.to_string()));
        self.forget_old();
    }

    /// Status of one request, if it is still remembered.
    #[must_use]
    pub fn request(&self, request: RequestId) -> Option<&RequestStatus> {
        self.requests.get(&request)
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.requests.values().filter(|s| !s.is_settled()).count()
    }

    fn forget_old(&mut self) {
        let settled: Vec<RequestId> = self
            .requests
            .iter()
            .filter(|(_, status)| status.is_settled())
            .map(|(id, _)| *id)
            .collect();
        let excess = settled.len().saturating_sub(SETTLED_HISTORY);
        for id in settled.into_iter().take(excess) {
            self.requests.remove(&id);
        }
    }
}

/// Transition handlers of one slice.
///
/// Implementors provide the slice-specific merges; the default `pending`,
/// `fulfilled` and `rejected` methods do the shared status bookkeeping first.
pub trait Slice {
    fn status(&self) -> &SliceStatus;

    fn status_mut(&mut self) -> &mut SliceStatus;

    fn on_pending(&mut self, _operation: &Operation) {}

    fn on_fulfilled(&mut self, outcome: &Outcome);

    fn on_rejected(&mut self, _operation: &Operation) {}

    fn pending(&mut self, request: RequestId, operation: &Operation) {
        self.status_mut().begin(request);
        self.on_pending(operation);
    }

    fn fulfilled(&mut self, request: RequestId, outcome: &Outcome) {
        self.status_mut().fulfill(request);
        self.on_fulfilled(outcome);
    }

    fn rejected(&mut self, request: RequestId, operation: &Operation, message: &str) {
        self.status_mut().reject(request, message);
        self.on_rejected(operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_flag_follows_last_transition() {
        let mut status = SliceStatus::default();
        status.begin(RequestId(1));
        status.begin(RequestId(2));
        status.fulfill(RequestId(1));

        assert!(!status.loading, "last transition wins");
        assert_eq!(status.request(RequestId(2)), Some(&RequestStatus::Pending));
        assert_eq!(status.in_flight(), 1);
    }

    #[test]
    fn pending_clears_previous_error() {
        let mut status = SliceStatus::default();
        status.begin(RequestId(1));
        status.reject(RequestId(1), "boom");
        assert_eq!(status.error.as_deref(), Some("boom"));

        status.begin(RequestId(2));
        assert!(status.loading);
        assert_eq!(status.error, None);
        assert_eq!(
            status.request(RequestId(1)),
            Some(&RequestStatus::Rejected("boom".to_string()))
        );
    }

    #[test]
    fn settled_history_is_bounded() {
        let mut status = SliceStatus::default();
        status.begin(RequestId(0));
        for n in 1..=100 {
            status.begin(RequestId(n));
            status.fulfill(RequestId(n));
        }

        assert_eq!(status.request(RequestId(0)), Some(&RequestStatus::Pending));
        assert_eq!(status.request(RequestId(1)), None);
        assert_eq!(status.request(RequestId(100)), Some(&RequestStatus::Fulfilled));
        assert_eq!(status.requests.len(), SETTLED_HISTORY + 1);
    }
}
