//! Domain layer for the CancApp client.
//!
//! Plain records mirrored from the remote API, the cached session credential,
//! typed identifiers and the client-side validation rules. Nothing here knows
//! about HTTP or storage.
//!
//! # Organization
//!
//! - [`error`]: Local error type and result alias
//! - [`id`]: Typed identifiers
//! - [`user`], [`post`], [`comment`]: Entities
//! - [`credential`]: Session credential
//! - [`validation`]: Checks applied before dispatch

pub mod comment;
pub mod credential;
pub mod error;
pub mod id;
pub mod post;
pub mod user;
pub mod validation;

pub use comment::Comment;
pub use credential::{Credential, Secret};
pub use error::{CancappError, Result};
pub use id::{CommentId, Id, PostId, UserId};
pub use post::Post;
pub use user::{User, UserType};
pub use validation::ValidationError;
