//! Comment domain model.

use super::id::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};

/// A comment on a post.
///
/// Every comment belongs to exactly one post; the backend enforces that the
/// post exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    pub post_id: PostId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image_url: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}
