//! Presentation layer.
//!
//! ```text
//! RootState + ViewState → compute → view model → render_* → String
//! ```
//!
//! - [`viewmodel`]: display-ready feed and profile models
//! - [`renderer`]: plain-text rendering for the CLI

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_comments, render_feed, render_profile};
pub use viewmodel::{
    comment_rows, CommentRow, EmptyState, FeedViewModel, PostCard, ProfileViewModel, UserRow, PREVIEW_CHARS,
};
