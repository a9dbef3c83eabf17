//! Post feed state.

use super::{Slice, SliceStatus};
use crate::domain::{Post, PostId};
use crate::worker::{Outcome, PostUpdate};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    /// Feed in the order the backend returned it; new posts go first.
    pub all_posts: Vec<Post>,
    pub status: SliceStatus,
}

impl PostsState {
    #[must_use]
    pub fn get(&self, post_id: &PostId) -> Option<&Post> {
        self.all_posts.iter().find(|post| &post.id == post_id)
    }

    fn get_mut(&mut self, post_id: &PostId) -> Option<&mut Post> {
        self.all_posts.iter_mut().find(|post| &post.id == post_id)
    }
}

impl Slice for PostsState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }

    fn on_fulfilled(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Posts(posts) => self.all_posts.clone_from(posts),
            Outcome::PostCreated(post) => self.all_posts.insert(0, post.clone()),
            Outcome::PostUpdated(PostUpdate::Replaced(post)) => {
                if let Some(slot) = self.get_mut(&post.id) {
                    *slot = post.clone();
                } else {
                    tracing::debug!(post_id = %post.id, "updated post not in feed");
                }
            }
            Outcome::PostUpdated(PostUpdate::Patched { post_id, content }) => {
                if let Some(slot) = self.get_mut(post_id) {
                    slot.content.clone_from(content);
                }
            }
            Outcome::PostDeleted(post_id) => self.all_posts.retain(|post| &post.id != post_id),
            _ => {}
        }
    }
}
