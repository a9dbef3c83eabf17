//! Response envelopes used by the backend.
//!
//! Most endpoints wrap their payload as `{ "value": ... }`; a few return it
//! bare. The post listing nests one level deeper under `value.data`.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { value: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { value } | Self::Bare(value) => value,
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Acknowledgement bodies that may carry a human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, Post};

    #[test]
    fn unwraps_value_and_bare_shapes() {
        let wrapped: Envelope<Vec<Comment>> = serde_json::from_str(
            r#"{"value":[{"id":1,"postId":42,"content":"nice"}]}"#,
        )
        .unwrap();
        let bare: Envelope<Vec<Comment>> =
            serde_json::from_str(r#"[{"id":1,"postId":42,"content":"nice"}]"#).unwrap();
        assert_eq!(wrapped.into_inner(), bare.into_inner());
    }

    #[test]
    fn post_listing_nests_under_data() {
        let page: Envelope<Page<Post>> = serde_json::from_str(
            r#"{"value":{"data":[{"id":1,"content":"a"},{"id":2,"content":"b"}],"pageNumber":1}}"#,
        )
        .unwrap();
        let posts = page.into_inner().data;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].content, "b");
    }
}
