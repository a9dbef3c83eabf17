//! Post domain model and timestamp helpers.
//!
//! Posts are mirrored from the backend feed. Besides the record itself this
//! module owns the relative-time formatting shared by posts and comments.

use super::id::{PostId, UserId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: i64 = 60;

const SECONDS_PER_HOUR: i64 = 3600;

const SECONDS_PER_DAY: i64 = 86400;

/// A feed post as returned by the backend.
///
/// `author_avatar_url` maps the backend's misspelled `userProgilePictureUrl`
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,

    #[serde(default)]
    pub content: String,

    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, rename = "name", skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    #[serde(
        default,
        rename = "userProgilePictureUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default)]
    pub comments_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl Post {
    /// Parses the backend timestamp, if any.
    #[must_use]
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.time.as_deref().and_then(parse_timestamp)
    }

    /// Returns `true` when the content is too long to show without a "read more".
    #[must_use]
    pub fn is_long(&self, preview_chars: usize) -> bool {
        self.content.chars().count() > preview_chars
    }
}

/// Parses a backend timestamp.
///
/// The backend emits RFC 3339 timestamps, but older records come back without
/// an offset; those are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats the distance between `then` and `now` as a compact relative time.
///
/// # Example
///
/// ```
/// use cancapp::domain::post::time_ago;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
/// ```
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds();

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        let mins = diff / SECONDS_PER_MINUTE;
        format!("{mins}m ago")
    } else if diff < SECONDS_PER_DAY {
        let hours = diff / SECONDS_PER_HOUR;
        format!("{hours}h ago")
    } else {
        let days = diff / SECONDS_PER_DAY;
        format!("{days}d ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn deserializes_feed_entry() {
        let post: Post = serde_json::from_str(
            r#"{"id":42,"content":"hi","imageUrl":null,"name":"Sara","userProgilePictureUrl":"https://a/1.png","time":"2025-03-01T10:00:00","commentsCount":3}"#,
        )
        .unwrap();

        assert_eq!(post.id.as_str(), "42");
        assert_eq!(post.author_name.as_deref(), Some("Sara"));
        assert_eq!(post.author_avatar_url.as_deref(), Some("https://a/1.png"));
        assert_eq!(post.comments_count, 3);
        assert!(post.posted_at().is_some());
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(10), now), "just now");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn timestamps_with_offset_and_without() {
        assert!(parse_timestamp("2025-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2025-03-01T10:00:00.1234567").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
