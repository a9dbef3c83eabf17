//! Remote execution layer.
//!
//! Operations are executed off the state-mutation path so that a slow request
//! only suspends the operation that issued it.
//!
//! - `messages`: operation and outcome types
//! - `handler`: [`Worker`], which performs the HTTP call for each operation

pub mod handler;
pub mod messages;

pub use handler::{PostUpdateRoute, Worker, WorkerSettings};
pub use messages::{
    CommentUpdate, LoginForm, Operation, Outcome, PostDraft, PostUpdate, ProfileForm, RegisterForm,
};
