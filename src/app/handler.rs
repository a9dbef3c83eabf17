//! Page-level event handling for the feed and profile views.
//!
//! [`ViewState`] holds the per-page interaction state:
//! which posts are expanded, which comment lists are open, in-progress
//! drafts and edits, and the user-directory filter. Server-derived data stays
//! in [`RootState`]; the handler only reads it.
//!
//! # Flow
//!
//! ```text
//! user input ─→ Event ─→ handle_event ─→ ViewState mutations ─→ Vec<Action>
//!                  ↑                                                  │
//!                  └──────── Event::Settled ←── Store::dispatch ←─────┘
//! ```

use super::actions::Action;
use super::guard::Route;
use super::state::RootState;
use crate::api::ImageUpload;
use crate::domain::{CommentId, PostId};
use crate::worker::{Operation, Outcome, PostDraft};
use std::collections::{BTreeMap, BTreeSet};

const DELETE_POST_FAILED: &str = "Failed to delete post";
const UPDATE_POST_FAILED: &str = "Failed to update post";
const CREATE_COMMENT_FAILED: &str = "Failed to create comment";
const UPDATE_COMMENT_FAILED: &str = "Failed to update comment";
const DELETE_COMMENT_FAILED: &str = "Failed to delete comment";

/// A post being edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEdit {
    pub post_id: PostId,
    pub content: String,
    pub image: Option<ImageUpload>,
}

/// A comment being edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEdit {
    pub post_id: PostId,
    pub comment_id: CommentId,
    pub content: String,
}

/// Local UI state for the feed and profile pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub expanded: BTreeSet<PostId>,
    pub open_comments: BTreeSet<PostId>,
    pub open_inputs: BTreeSet<PostId>,
    pub comment_drafts: BTreeMap<PostId, String>,
    pub new_post: PostDraft,
    pub editing_post: Option<PostEdit>,
    pub editing_comment: Option<CommentEdit>,
    pub user_filter: String,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_expanded(&self, post_id: &PostId) -> bool {
        self.expanded.contains(post_id)
    }

    #[must_use]
    pub fn comments_visible(&self, post_id: &PostId) -> bool {
        self.open_comments.contains(post_id)
    }

    #[must_use]
    pub fn input_visible(&self, post_id: &PostId) -> bool {
        self.open_inputs.contains(post_id)
    }

    #[must_use]
    pub fn comment_draft(&self, post_id: &PostId) -> &str {
        self.comment_drafts.get(post_id).map_or("", String::as_str)
    }
}

/// User input on the feed/profile pages, or the result of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// "See more" / "see less" on a long post.
    ToggleExpanded(PostId),
    /// Shows or hides a post's comments; showing them fetches the list.
    ToggleComments(PostId),
    /// Shows or hides the comment input under a post.
    ToggleCommentInput(PostId),
    CommentInput { post_id: PostId, text: String },
    SubmitComment(PostId),

    DraftInput(String),
    DraftImage(Option<ImageUpload>),
    SubmitDraft,

    StartPostEdit(PostId),
    PostEditInput(String),
    PostEditImage(Option<ImageUpload>),
    SubmitPostEdit,
    CancelPostEdit,
    DeletePost(PostId),

    StartCommentEdit { post_id: PostId, comment_id: CommentId },
    CommentEditInput(String),
    SubmitCommentEdit,
    CancelCommentEdit,
    DeleteComment { post_id: PostId, comment_id: CommentId },

    FilterUsers(String),

    /// A dispatched operation finished, with its outcome or failure message.
    Settled {
        operation: Operation,
        result: Result<Outcome, String>,
    },
}

/// Applies `event` to the view and returns whether to re-render plus the
/// actions to run.
///
/// `root` is read for data the view needs to seed edits (e.g. the current
/// body of the post being edited); the handler never writes to it.
#[allow(clippy::too_many_lines)]
pub fn handle_event(view: &mut ViewState, root: &RootState, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::ToggleExpanded(post_id) => {
            toggle(&mut view.expanded, post_id);
            (true, vec![])
        }
        Event::ToggleComments(post_id) => {
            if toggle(&mut view.open_comments, post_id) {
                tracing::debug!(%post_id, "comments opened, fetching");
                (true, vec![Action::Dispatch(Operation::FetchComments { post_id: post_id.clone() })])
            } else {
                (true, vec![])
            }
        }
        Event::ToggleCommentInput(post_id) => {
            toggle(&mut view.open_inputs, post_id);
            (true, vec![])
        }
        Event::CommentInput { post_id, text } => {
            view.comment_drafts.insert(post_id.clone(), text.clone());
            (true, vec![])
        }
        Event::SubmitComment(post_id) => {
            let content = view.comment_draft(post_id).to_string();
            (
                false,
                vec![Action::Dispatch(Operation::CreateComment {
                    post_id: post_id.clone(),
                    content,
                })],
            )
        }

        Event::DraftInput(text) => {
            view.new_post.content.clone_from(text);
            (true, vec![])
        }
        Event::DraftImage(image) => {
            view.new_post.image.clone_from(image);
            (true, vec![])
        }
        Event::SubmitDraft => (false, vec![Action::Dispatch(Operation::CreatePost(view.new_post.clone()))]),

        Event::StartPostEdit(post_id) => {
            let Some(post) = root.posts.get(post_id) else {
                tracing::debug!(%post_id, "edit requested for a post not in the feed");
                return (false, vec![]);
            };
            view.editing_post = Some(PostEdit {
                post_id: post_id.clone(),
                content: post.content.clone(),
                image: None,
            });
            (true, vec![])
        }
        Event::PostEditInput(text) => match view.editing_post.as_mut() {
            Some(edit) => {
                edit.content.clone_from(text);
                (true, vec![])
            }
            None => (false, vec![]),
        },
        Event::PostEditImage(image) => match view.editing_post.as_mut() {
            Some(edit) => {
                edit.image.clone_from(image);
                (true, vec![])
            }
            None => (false, vec![]),
        },
        Event::SubmitPostEdit => match &view.editing_post {
            Some(edit) => (
                false,
                vec![Action::Dispatch(Operation::UpdatePost {
                    post_id: edit.post_id.clone(),
                    draft: PostDraft {
                        content: edit.content.clone(),
                        image: edit.image.clone(),
                    },
                })],
            ),
            None => (false, vec![]),
        },
        Event::CancelPostEdit => (view.editing_post.take().is_some(), vec![]),
        Event::DeletePost(post_id) => (
            false,
            vec![Action::Dispatch(Operation::DeletePost { post_id: post_id.clone() })],
        ),

        Event::StartCommentEdit { post_id, comment_id } => {
            let content = root
                .comments
                .for_post(post_id)
                .and_then(|comments| comments.iter().find(|c| &c.id == comment_id))
                .map(|c| c.content.clone());
            let Some(content) = content else {
                tracing::debug!(%post_id, %comment_id, "edit requested for an unknown comment");
                return (false, vec![]);
            };
            view.editing_comment = Some(CommentEdit {
                post_id: post_id.clone(),
                comment_id: comment_id.clone(),
                content,
            });
            (true, vec![])
        }
        Event::CommentEditInput(text) => match view.editing_comment.as_mut() {
            Some(edit) => {
                edit.content.clone_from(text);
                (true, vec![])
            }
            None => (false, vec![]),
        },
        Event::SubmitCommentEdit => match &view.editing_comment {
            Some(edit) => (
                false,
                vec![Action::Dispatch(Operation::EditComment {
                    post_id: edit.post_id.clone(),
                    comment_id: edit.comment_id.clone(),
                    content: edit.content.clone(),
                })],
            ),
            None => (false, vec![]),
        },
        Event::CancelCommentEdit => (view.editing_comment.take().is_some(), vec![]),
        Event::DeleteComment { post_id, comment_id } => (
            false,
            vec![Action::Dispatch(Operation::DeleteComment {
                post_id: post_id.clone(),
                comment_id: comment_id.clone(),
            })],
        ),

        Event::FilterUsers(query) => {
            if view.user_filter == *query {
                return (false, vec![]);
            }
            view.user_filter.clone_from(query);
            (true, vec![])
        }

        Event::Settled { operation, result: Ok(outcome) } => settled_ok(view, operation, outcome),
        Event::Settled { operation, result: Err(message) } => settled_err(operation, message),
    }
}

fn settled_ok(view: &mut ViewState, operation: &Operation, outcome: &Outcome) -> (bool, Vec<Action>) {
    match outcome {
        Outcome::LoggedIn { .. } => (true, vec![Action::Navigate(Route::Home)]),
        Outcome::Registered(_) => (true, vec![Action::Navigate(Route::ConfirmEmail)]),
        Outcome::EmailConfirmed => (true, vec![Action::Navigate(Route::Login)]),
        Outcome::PasswordChanged { .. } => (true, vec![Action::Navigate(Route::Login)]),
        Outcome::PostCreated(_) => {
            view.new_post = PostDraft::default();
            (true, vec![])
        }
        Outcome::PostUpdated(_) => {
            view.editing_post = None;
            (true, vec![Action::Dispatch(Operation::FetchPosts)])
        }
        Outcome::PostDeleted(post_id) => {
            view.expanded.remove(post_id);
            view.open_comments.remove(post_id);
            view.open_inputs.remove(post_id);
            view.comment_drafts.remove(post_id);
            (true, vec![Action::Dispatch(Operation::FetchPosts)])
        }
        Outcome::CommentCreated { post_id, .. } => {
            view.comment_drafts.remove(post_id);
            (true, vec![Action::Dispatch(Operation::FetchComments { post_id: post_id.clone() })])
        }
        Outcome::CommentEdited { post_id, .. } => {
            view.editing_comment = None;
            (true, vec![Action::Dispatch(Operation::FetchComments { post_id: post_id.clone() })])
        }
        _ => {
            tracing::trace!(operation = operation.name(), "settled without view changes");
            (true, vec![])
        }
    }
}

fn settled_err(operation: &Operation, message: &str) -> (bool, Vec<Action>) {
    let alert = match operation {
        Operation::DeletePost { .. } => DELETE_POST_FAILED,
        Operation::UpdatePost { .. } => UPDATE_POST_FAILED,
        Operation::CreateComment { .. } => CREATE_COMMENT_FAILED,
        Operation::EditComment { .. } => UPDATE_COMMENT_FAILED,
        Operation::DeleteComment { .. } => DELETE_COMMENT_FAILED,
        _ => {
            tracing::debug!(operation = operation.name(), error = message, "failure shown inline");
            return (true, vec![]);
        }
    };
    tracing::debug!(operation = operation.name(), error = message, "raising alert");
    (true, vec![Action::Alert(alert.to_string())])
}

/// Flips membership of `id`; returns `true` if it is now present.
fn toggle(set: &mut BTreeSet<PostId>, id: &PostId) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.clone());
        true
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::ToggleExpanded(_) => "toggle_expanded",
        Event::ToggleComments(_) => "toggle_comments",
        Event::ToggleCommentInput(_) => "toggle_comment_input",
        Event::CommentInput { .. } => "comment_input",
        Event::SubmitComment(_) => "submit_comment",
        Event::DraftInput(_) => "draft_input",
        Event::DraftImage(_) => "draft_image",
        Event::SubmitDraft => "submit_draft",
        Event::StartPostEdit(_) => "start_post_edit",
        Event::PostEditInput(_) => "post_edit_input",
        Event::PostEditImage(_) => "post_edit_image",
        Event::SubmitPostEdit => "submit_post_edit",
        Event::CancelPostEdit => "cancel_post_edit",
        Event::DeletePost(_) => "delete_post",
        Event::StartCommentEdit { .. } => "start_comment_edit",
        Event::CommentEditInput(_) => "comment_edit_input",
        Event::SubmitCommentEdit => "submit_comment_edit",
        Event::CancelCommentEdit => "cancel_comment_edit",
        Event::DeleteComment { .. } => "delete_comment",
        Event::FilterUsers(_) => "filter_users",
        Event::Settled { .. } => "settled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, Post, User};
    use crate::worker::PostUpdate;

    fn post(id: &str, content: &str) -> Post {
        Post {
            id: PostId::from(id),
            content: content.to_string(),
            image_url: None,
            author_name: None,
            author_avatar_url: None,
            time: None,
            comments_count: 0,
            user_id: None,
        }
    }

    fn comment(id: &str, post_id: &str, content: &str) -> Comment {
        Comment {
            id: CommentId::from(id),
            post_id: PostId::from(post_id),
            user_id: None,
            name: None,
            user_image_url: None,
            content: content.to_string(),
            time: None,
        }
    }

    #[test]
    fn opening_comments_fetches_them() {
        let mut view = ViewState::new();
        let root = RootState::default();
        let post_id = PostId::from("7");

        let (render, actions) = handle_event(&mut view, &root, &Event::ToggleComments(post_id.clone()));
        assert!(render);
        assert_eq!(
            actions,
            vec![Action::Dispatch(Operation::FetchComments { post_id: post_id.clone() })]
        );
        assert!(view.comments_visible(&post_id));

        let (_, actions) = handle_event(&mut view, &root, &Event::ToggleComments(post_id.clone()));
        assert!(actions.is_empty(), "closing does not refetch");
        assert!(!view.comments_visible(&post_id));
    }

    #[test]
    fn submit_comment_uses_the_post_draft() {
        let mut view = ViewState::new();
        let root = RootState::default();
        let post_id = PostId::from("3");
        handle_event(
            &mut view,
            &root,
            &Event::CommentInput { post_id: post_id.clone(), text: "nice".into() },
        );

        let (_, actions) = handle_event(&mut view, &root, &Event::SubmitComment(post_id.clone()));
        assert_eq!(
            actions,
            vec![Action::Dispatch(Operation::CreateComment { post_id, content: "nice".into() })]
        );
    }

    #[test]
    fn post_edit_is_seeded_from_the_feed() {
        let mut view = ViewState::new();
        let mut root = RootState::default();
        root.posts.all_posts = vec![post("1", "original")];

        handle_event(&mut view, &root, &Event::StartPostEdit(PostId::from("1")));
        handle_event(&mut view, &root, &Event::PostEditInput("changed".into()));
        let (_, actions) = handle_event(&mut view, &root, &Event::SubmitPostEdit);

        assert_eq!(
            actions,
            vec![Action::Dispatch(Operation::UpdatePost {
                post_id: PostId::from("1"),
                draft: PostDraft::text("changed"),
            })]
        );
    }

    #[test]
    fn editing_unknown_post_is_ignored() {
        let mut view = ViewState::new();
        let (render, actions) =
            handle_event(&mut view, &RootState::default(), &Event::StartPostEdit(PostId::from("9")));
        assert!(!render);
        assert!(actions.is_empty());
        assert!(view.editing_post.is_none());
    }

    #[test]
    fn comment_edit_is_seeded_from_the_slice() {
        let mut view = ViewState::new();
        let mut root = RootState::default();
        root.comments
            .comments
            .insert(PostId::from("1"), vec![comment("c1", "1", "first")]);

        handle_event(
            &mut view,
            &root,
            &Event::StartCommentEdit { post_id: PostId::from("1"), comment_id: CommentId::from("c1") },
        );
        assert_eq!(view.editing_comment.as_ref().map(|e| e.content.as_str()), Some("first"));

        let (render, _) = handle_event(&mut view, &root, &Event::CancelCommentEdit);
        assert!(render);
        assert!(view.editing_comment.is_none());
    }

    #[test]
    fn successful_update_and_delete_refetch_posts() {
        let mut view = ViewState::new();
        let root = RootState::default();

        let updated = Event::Settled {
            operation: Operation::UpdatePost { post_id: PostId::from("1"), draft: PostDraft::text("x") },
            result: Ok(Outcome::PostUpdated(PostUpdate::Patched {
                post_id: PostId::from("1"),
                content: "x".into(),
            })),
        };
        let (_, actions) = handle_event(&mut view, &root, &updated);
        assert_eq!(actions, vec![Action::Dispatch(Operation::FetchPosts)]);

        let deleted = Event::Settled {
            operation: Operation::DeletePost { post_id: PostId::from("1") },
            result: Ok(Outcome::PostDeleted(PostId::from("1"))),
        };
        let (_, actions) = handle_event(&mut view, &root, &deleted);
        assert_eq!(actions, vec![Action::Dispatch(Operation::FetchPosts)]);
    }

    #[test]
    fn comment_create_refetches_that_post_and_clears_the_draft() {
        let mut view = ViewState::new();
        let post_id = PostId::from("5");
        view.comment_drafts.insert(post_id.clone(), "hi".into());

        let event = Event::Settled {
            operation: Operation::CreateComment { post_id: post_id.clone(), content: "hi".into() },
            result: Ok(Outcome::CommentCreated {
                post_id: post_id.clone(),
                comment: Some(comment("c9", "5", "hi")),
            }),
        };
        let (_, actions) = handle_event(&mut view, &RootState::default(), &event);
        assert_eq!(
            actions,
            vec![Action::Dispatch(Operation::FetchComments { post_id: post_id.clone() })]
        );
        assert_eq!(view.comment_draft(&post_id), "");
    }

    #[test]
    fn destructive_failures_raise_alerts() {
        let mut view = ViewState::new();
        let root = RootState::default();
        let cases = [
            (Operation::DeletePost { post_id: PostId::from("42") }, "Failed to delete post"),
            (
                Operation::UpdatePost { post_id: PostId::from("42"), draft: PostDraft::text("x") },
                "Failed to update post",
            ),
            (
                Operation::CreateComment { post_id: PostId::from("42"), content: "x".into() },
                "Failed to create comment",
            ),
            (
                Operation::EditComment {
                    post_id: PostId::from("42"),
                    comment_id: CommentId::from("1"),
                    content: "x".into(),
                },
                "Failed to update comment",
            ),
        ];

        for (operation, alert) in cases {
            let event = Event::Settled { operation, result: Err("Post not found".into()) };
            let (_, actions) = handle_event(&mut view, &root, &event);
            assert_eq!(actions, vec![Action::Alert(alert.to_string())]);
        }
    }

    #[test]
    fn fetch_failure_is_shown_inline() {
        let mut view = ViewState::new();
        let event = Event::Settled {
            operation: Operation::FetchPosts,
            result: Err("Failed to fetch posts".into()),
        };
        let (render, actions) = handle_event(&mut view, &RootState::default(), &event);
        assert!(render);
        assert!(actions.is_empty());
    }

    #[test]
    fn auth_successes_navigate() {
        let mut view = ViewState::new();
        let root = RootState::default();
        let user = User {
            id: "1".into(),
            name: "Ada".into(),
            email: None,
            address: String::new(),
            image: None,
            user_type: Default::default(),
        };

        let login = Event::Settled {
            operation: Operation::SaveToken,
            result: Ok(Outcome::LoggedIn { token: "t".into(), user }),
        };
        assert_eq!(handle_event(&mut view, &root, &login).1, vec![Action::Navigate(Route::Home)]);

        let password = Event::Settled {
            operation: Operation::SaveToken,
            result: Ok(Outcome::PasswordChanged { message: "ok".into() }),
        };
        assert_eq!(handle_event(&mut view, &root, &password).1, vec![Action::Navigate(Route::Login)]);

        let registered = Event::Settled {
            operation: Operation::SaveToken,
            result: Ok(Outcome::Registered(None)),
        };
        assert_eq!(
            handle_event(&mut view, &root, &registered).1,
            vec![Action::Navigate(Route::ConfirmEmail)]
        );
    }

    #[test]
    fn unchanged_filter_skips_render() {
        let mut view = ViewState::new();
        let root = RootState::default();
        assert!(handle_event(&mut view, &root, &Event::FilterUsers("ad".into())).0);
        assert!(!handle_event(&mut view, &root, &Event::FilterUsers("ad".into())).0);
    }
}
