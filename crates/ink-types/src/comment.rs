use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::temporal;

/// A reader note attached to one post.
///
/// Comments have no identity of their own; they belong to a post through the
/// storage key their collection lives under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    #[serde(with = "temporal::iso8601")]
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn from_draft(draft: CommentDraft, date: DateTime<Utc>) -> Self {
        Self {
            author: draft.author,
            text: draft.text,
            date,
        }
    }
}

/// Trimmed and validated input from the comment form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentDraft {
    author: String,
    text: String,
}

impl CommentDraft {
    /// Trim both fields; both must be non-empty afterwards.
    pub fn new(author: &str, text: &str) -> Result<Self, TypeError> {
        let author = author.trim();
        let text = text.trim();
        if author.is_empty() {
            return Err(TypeError::EmptyField("author"));
        }
        if text.is_empty() {
            return Err(TypeError::EmptyField("text"));
        }
        Ok(Self {
            author: author.to_string(),
            text: text.to_string(),
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn comment_json_matches_storage_layout() {
        let comment = Comment {
            author: "Ada".into(),
            text: "Nice post".into(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let json = serde_json::to_string(&comment).unwrap();
        assert_eq!(
            json,
            r#"{"author":"Ada","text":"Nice post","date":"2024-01-02T03:04:05.000Z"}"#
        );
        let back: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, comment);
    }

    #[test]
    fn draft_trims_and_validates() {
        let draft = CommentDraft::new(" Ada ", " hi ").unwrap();
        assert_eq!(draft.author(), "Ada");
        assert_eq!(draft.text(), "hi");

        assert_eq!(CommentDraft::new("", "hi"), Err(TypeError::EmptyField("author")));
        assert_eq!(CommentDraft::new("Ada", "  "), Err(TypeError::EmptyField("text")));
    }
}
