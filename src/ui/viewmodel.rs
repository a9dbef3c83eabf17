//! Display-ready view models for the feed and profile pages.
//!
//! View models are computed from a [`RootState`] snapshot plus the page's
//! [`ViewState`] and carry no behaviour; the renderer only formats them.

use crate::app::{RootState, ViewState};
use crate::domain::post::time_ago;
use crate::domain::{Comment, CommentId, Post, PostId, User, UserId};
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Characters shown before "see more".
pub const PREVIEW_CHARS: usize = 200;

const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedViewModel {
    pub cards: Vec<PostCard>,
    pub loading: bool,
    pub error: Option<String>,
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub post_id: PostId,
    pub author: String,
    pub avatar_url: Option<String>,
    /// Relative time, e.g. "5m ago".
    pub posted: Option<String>,
    pub body: String,
    /// `true` when `body` is a preview of a longer post.
    pub truncated: bool,
    pub image_url: Option<String>,
    pub comments_count: u32,
    pub editing: bool,
    /// `None` while the comment list is hidden.
    pub comments: Option<Vec<CommentRow>>,
    /// Current draft, present while the comment input is shown.
    pub comment_input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub comment_id: CommentId,
    pub author: String,
    pub body: String,
    pub posted: Option<String>,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

impl FeedViewModel {
    /// Builds the feed as of `now`.
    #[must_use]
    pub fn compute(root: &RootState, view: &ViewState, now: DateTime<Utc>) -> Self {
        let _span = tracing::debug_span!("compute_feed", posts = root.posts.all_posts.len()).entered();

        let cards: Vec<PostCard> = root
            .posts
            .all_posts
            .iter()
            .map(|post| post_card(post, root, view, now))
            .collect();

        let empty_state = (cards.is_empty() && !root.posts.status.loading).then(|| EmptyState {
            message: "No posts yet".to_string(),
            subtitle: "Create one with `cancapp post create`".to_string(),
        });

        Self {
            cards,
            loading: root.posts.status.loading,
            error: root.posts.status.error.clone(),
            empty_state,
        }
    }
}

fn post_card(post: &Post, root: &RootState, view: &ViewState, now: DateTime<Utc>) -> PostCard {
    let edit = view
        .editing_post
        .as_ref()
        .filter(|edit| edit.post_id == post.id);

    let (body, truncated) = match edit {
        Some(edit) => (edit.content.clone(), false),
        None if post.is_long(PREVIEW_CHARS) && !view.is_expanded(&post.id) => {
            let preview: String = post.content.chars().take(PREVIEW_CHARS).collect();
            (format!("{preview}..."), true)
        }
        None => (post.content.clone(), false),
    };

    let comments = view
        .comments_visible(&post.id)
        .then(|| comment_rows(root, view, &post.id, now));

    let comment_input = view
        .input_visible(&post.id)
        .then(|| view.comment_draft(&post.id).to_string());

    PostCard {
        post_id: post.id.clone(),
        author: display_name(post.author_name.as_deref()),
        avatar_url: post.author_avatar_url.clone(),
        posted: post.posted_at().map(|then| time_ago(then, now)),
        body,
        truncated,
        image_url: post.image_url.clone(),
        comments_count: post.comments_count,
        editing: edit.is_some(),
        comments,
        comment_input,
    }
}

/// Comment rows for one post, whether or not its list is open in `view`.
#[must_use]
pub fn comment_rows(
    root: &RootState,
    view: &ViewState,
    post_id: &PostId,
    now: DateTime<Utc>,
) -> Vec<CommentRow> {
    root.comments
        .for_post(post_id)
        .unwrap_or_default()
        .iter()
        .map(|comment| comment_row(comment, view, now))
        .collect()
}

fn comment_row(comment: &Comment, view: &ViewState, now: DateTime<Utc>) -> CommentRow {
    let edit = view
        .editing_comment
        .as_ref()
        .filter(|edit| edit.post_id == comment.post_id && edit.comment_id == comment.id);

    CommentRow {
        comment_id: comment.id.clone(),
        author: display_name(comment.name.as_deref()),
        body: edit.map_or_else(|| comment.content.clone(), |edit| edit.content.clone()),
        posted: comment
            .time
            .as_deref()
            .and_then(crate::domain::post::parse_timestamp)
            .map(|then| time_ago(then, now)),
        editing: edit.is_some(),
    }
}

fn display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileViewModel {
    pub users: Vec<UserRow>,
    pub filter: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub address: String,
    pub user_type: String,
    pub image: Option<String>,
    /// The signed-in user's own entry.
    pub editable: bool,
}

impl ProfileViewModel {
    /// Builds the user directory, filtered by `view.user_filter`.
    ///
    /// Every whitespace-separated token of the filter must fuzzy-match the
    /// user's name; matches are ordered by score, best first.
    #[must_use]
    pub fn compute(root: &RootState, view: &ViewState, own_id: Option<&UserId>) -> Self {
        let _span = tracing::debug_span!(
            "compute_profile",
            total_users = root.profile.users.len(),
            query_len = view.user_filter.len()
        )
        .entered();

        let tokens: Vec<String> = view
            .user_filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let users: Vec<UserRow> = if tokens.is_empty() {
            root.profile.users.iter().map(|user| user_row(user, own_id)).collect()
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, &User)> = root
                .profile
                .users
                .iter()
                .filter_map(|user| {
                    let name = user.name.to_lowercase();
                    tokens
                        .iter()
                        .map(|token| matcher.fuzzy_match(&name, token))
                        .sum::<Option<i64>>()
                        .map(|score| (score, user))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            scored.into_iter().map(|(_, user)| user_row(user, own_id)).collect()
        };

        tracing::debug!(filtered_count = users.len(), "user filter applied");

        Self {
            users,
            filter: view.user_filter.clone(),
            message: root.profile.message.clone(),
            error: root.profile.status.error.clone(),
            loading: root.profile.status.loading,
        }
    }
}

fn user_row(user: &User, own_id: Option<&UserId>) -> UserRow {
    UserRow {
        user_id: user.id.clone(),
        name: display_name(Some(user.name.as_str())),
        address: user.address.clone(),
        user_type: user.user_type.to_string(),
        image: user.image.clone(),
        editable: own_id == Some(&user.id),
    }
}
