//! Root state aggregator.
//!
//! [`RootState`] composes the feature slices into one tree and routes every
//! transition to the slice that owns the operation. It is plain data: the
//! [`crate::app::Store`] owns the live copy and publishes snapshots.

use super::slices::{
    AuthState, CommentsState, LoginState, PostsState, ProfileState, RequestId, Slice, SliceName,
};
use crate::worker::{Operation, Outcome};

/// Application state, one field per slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub auth: AuthState,
    pub login: LoginState,
    pub posts: PostsState,
    pub comments: CommentsState,
    pub profile: ProfileState,
}

/// Slice that owns `operation`.
#[must_use]
pub const fn owning_slice(operation: &Operation) -> SliceName {
    match operation {
        Operation::RegisterUser(_)
        | Operation::ConfirmEmail { .. }
        | Operation::ResendConfirmEmail { .. } => SliceName::Auth,
        Operation::LoginUser(_) => SliceName::Login,
        Operation::FetchPosts
        | Operation::CreatePost(_)
        | Operation::UpdatePost { .. }
        | Operation::DeletePost { .. } => SliceName::Posts,
        Operation::FetchComments { .. }
        | Operation::CreateComment { .. }
        | Operation::EditComment { .. }
        | Operation::DeleteComment { .. } => SliceName::Comments,
        Operation::SaveToken
        | Operation::FetchUsers
        | Operation::UpdateProfile(_)
        | Operation::ChangePassword { .. } => SliceName::Profile,
    }
}

impl RootState {
    #[must_use]
    pub fn slice(&self, name: SliceName) -> &dyn Slice {
        match name {
            SliceName::Auth => &self.auth,
            SliceName::Login => &self.login,
            SliceName::Posts => &self.posts,
            SliceName::Comments => &self.comments,
            SliceName::Profile => &self.profile,
        }
    }

    pub fn slice_mut(&mut self, name: SliceName) -> &mut dyn Slice {
        match name {
            SliceName::Auth => &mut self.auth,
            SliceName::Login => &mut self.login,
            SliceName::Posts => &mut self.posts,
            SliceName::Comments => &mut self.comments,
            SliceName::Profile => &mut self.profile,
        }
    }

    pub fn begin(&mut self, request: RequestId, operation: &Operation) {
        let slice = owning_slice(operation);
        tracing::trace!(%request, %slice, operation = operation.name(), "pending");
        self.slice_mut(slice).pending(request, operation);
    }

    pub fn fulfill(&mut self, request: RequestId, operation: &Operation, outcome: &Outcome) {
        let slice = owning_slice(operation);
        tracing::trace!(%request, %slice, operation = operation.name(), "fulfilled");
        self.slice_mut(slice).fulfilled(request, outcome);
    }

    pub fn reject(&mut self, request: RequestId, operation: &Operation, message: &str) {
        let slice = owning_slice(operation);
        tracing::trace!(%request, %slice, operation = operation.name(), error = message, "rejected");
        self.slice_mut(slice).rejected(request, operation, message);
    }

    /// `true` while any slice has an operation in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        [
            SliceName::Auth,
            SliceName::Login,
            SliceName::Posts,
            SliceName::Comments,
            SliceName::Profile,
        ]
        .into_iter()
        .any(|name| self.slice(name).status().loading)
    }
}
