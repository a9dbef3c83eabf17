//! Comments grouped by owning post.

use super::{Slice, SliceStatus};
use crate::domain::{Comment, PostId};
use crate::worker::{CommentUpdate, Outcome};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentsState {
    /// Every transition touches at most the entry of its own post.
    pub comments: BTreeMap<PostId, Vec<Comment>>,
    pub status: SliceStatus,
}

impl CommentsState {
    #[must_use]
    pub fn for_post(&self, post_id: &PostId) -> Option<&[Comment]> {
        self.comments.get(post_id).map(Vec::as_slice)
    }
}

impl Slice for CommentsState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }

    fn on_fulfilled(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Comments { post_id, comments } => {
                self.comments.insert(post_id.clone(), comments.clone());
            }
            Outcome::CommentCreated {
                post_id,
                comment: Some(comment),
            } => {
                self.comments
                    .entry(post_id.clone())
                    .or_default()
                    .push(comment.clone());
            }
            Outcome::CommentEdited { post_id, edit } => {
                let target = match edit {
                    CommentUpdate::Replaced(comment) => &comment.id,
                    CommentUpdate::Patched { comment_id, .. } => comment_id,
                };
                let slot = self
                    .comments
                    .get_mut(post_id)
                    .and_then(|list| list.iter_mut().find(|c| &c.id == target));
                if let Some(slot) = slot {
                    match edit {
                        CommentUpdate::Replaced(comment) => *slot = comment.clone(),
                        CommentUpdate::Patched { content, .. } => slot.content.clone_from(content),
                    }
                }
            }
            Outcome::CommentDeleted {
                post_id,
                comment_id,
            } => {
                if let Some(list) = self.comments.get_mut(post_id) {
                    list.retain(|c| &c.id != comment_id);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::slices::RequestId;
    use crate::domain::CommentId;

    fn comment(id: &str, post: &str, content: &str) -> Comment {
        Comment {
            id: CommentId::new(id),
            post_id: PostId::new(post),
            user_id: None,
            name: None,
            user_image_url: None,
            content: content.to_string(),
            time: None,
        }
    }

    fn seeded() -> CommentsState {
        let mut state = CommentsState::default();
        state.fulfilled(
            RequestId(1),
            &Outcome::Comments {
                post_id: PostId::new("1"),
                comments: vec![comment("10", "1", "a"), comment("11", "1", "b")],
            },
        );
        state.fulfilled(
            RequestId(2),
            &Outcome::Comments {
                post_id: PostId::new("2"),
                comments: vec![comment("20", "2", "c")],
            },
        );
        state
    }

    #[test]
    fn fetching_one_post_leaves_others_alone() {
        let mut state = seeded();
        let other_before = state.comments.get(&PostId::new("2")).cloned();

        state.fulfilled(
            RequestId(3),
            &Outcome::Comments {
                post_id: PostId::new("1"),
                comments: vec![comment("12", "1", "fresh")],
            },
        );

        assert_eq!(state.for_post(&PostId::new("1")).map(<[_]>::len), Some(1));
        assert_eq!(state.comments.get(&PostId::new("2")).cloned(), other_before);
    }

    #[test]
    fn create_appends_and_creates_group() {
        let mut state = seeded();
        state.fulfilled(
            RequestId(3),
            &Outcome::CommentCreated {
                post_id: PostId::new("3"),
                comment: Some(comment("30", "3", "first!")),
            },
        );
        state.fulfilled(
            RequestId(4),
            &Outcome::CommentCreated {
                post_id: PostId::new("1"),
                comment: Some(comment("13", "1", "late")),
            },
        );

        assert_eq!(state.for_post(&PostId::new("3")).map(<[_]>::len), Some(1));
        let first = state.for_post(&PostId::new("1")).unwrap();
        assert_eq!(first.last().map(|c| c.content.as_str()), Some("late"));
    }

    #[test]
    fn edit_and_delete_target_one_comment() {
        let mut state = seeded();
        state.fulfilled(
            RequestId(3),
            &Outcome::CommentEdited {
                post_id: PostId::new("1"),
                edit: CommentUpdate::Replaced(comment("11", "1", "edited")),
            },
        );
        state.fulfilled(
            RequestId(4),
            &Outcome::CommentDeleted {
                post_id: PostId::new("1"),
                comment_id: CommentId::new("10"),
            },
        );

        let remaining = state.for_post(&PostId::new("1")).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content, "edited");
        assert_eq!(state.for_post(&PostId::new("2")).map(<[_]>::len), Some(1));
    }

    #[test]
    fn bodiless_acknowledgements() {
        let mut state = seeded();
        let before = state.for_post(&PostId::new("1")).map(<[_]>::to_vec);

        state.fulfilled(
            RequestId(3),
            &Outcome::CommentCreated {
                post_id: PostId::new("1"),
                comment: None,
            },
        );
        assert_eq!(state.for_post(&PostId::new("1")).map(<[_]>::to_vec), before);

        state.fulfilled(
            RequestId(4),
            &Outcome::CommentEdited {
                post_id: PostId::new("1"),
                edit: CommentUpdate::Patched {
                    comment_id: CommentId::new("10"),
                    content: "patched".to_string(),
                },
            },
        );
        let comments = state.for_post(&PostId::new("1")).unwrap();
        assert_eq!(comments[0].id, CommentId::new("10"));
        assert_eq!(comments[0].content, "patched");
    }
}
