use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::temporal;

/// Identifier of a post.
///
/// Ids are creation timestamps in milliseconds since the UNIX epoch, bumped
/// when necessary so that every new id is strictly greater than all existing
/// ones. Serialized as a bare JSON number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Allocate an id for a post created at `now`.
    ///
    /// The id is `now` in milliseconds unless an existing id is equal or
    /// larger, in which case it is one past the largest existing id.
    pub fn generate(now: DateTime<Utc>, existing: impl IntoIterator<Item = PostId>) -> Self {
        let candidate = now.timestamp_millis();
        match existing.into_iter().max() {
            Some(max) if max.0 >= candidate => Self(max.0.saturating_add(1)),
            _ => Self(candidate),
        }
    }

    /// Parse an id the way a query parameter or `data-id` attribute is read.
    ///
    /// Leading whitespace and an optional sign are accepted, then the longest
    /// run of ASCII digits; anything after the digits is ignored. Returns
    /// `None` when there are no digits, the value overflows, or it is zero.
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let rest = text.trim_start();
        let (negative, rest) = match rest.as_bytes().first() {
            Some(b'-') => (true, &rest[1..]),
            Some(b'+') => (false, &rest[1..]),
            _ => (false, rest),
        };
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return None;
        }
        let magnitude: i64 = rest[..digits_len].parse().ok()?;
        let value = if negative { -magnitude } else { magnitude };
        (value != 0).then_some(Self(value))
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| TypeError::InvalidPostId(s.to_string()))
    }
}

impl From<i64> for PostId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A blog entry as persisted under the posts key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// Image URL; persisted as `""` when absent.
    #[serde(default, with = "temporal::blank_as_none")]
    pub image: Option<String>,
    #[serde(with = "temporal::iso8601")]
    pub date: DateTime<Utc>,
}

impl Post {
    /// Build a post from validated form input.
    pub fn from_draft(draft: PostDraft, id: PostId, date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            image: draft.image,
            date,
        }
    }
}

/// Trimmed and validated input from the post creation form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    content: String,
    image: Option<String>,
}

impl PostDraft {
    /// Trim the raw field values and check the required ones.
    ///
    /// Title and content must be non-empty after trimming; a blank image
    /// means no image.
    pub fn new(title: &str, content: &str, image: &str) -> Result<Self, TypeError> {
        let title = title.trim();
        let content = content.trim();
        let image = image.trim();
        if title.is_empty() {
            return Err(TypeError::EmptyField("title"));
        }
        if content.is_empty() {
            return Err(TypeError::EmptyField("content"));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            image: (!image.is_empty()).then(|| image.to_string()),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    // -----------------------------------------------------------------------
    // PostId
    // -----------------------------------------------------------------------

    #[test]
    fn generate_uses_timestamp_when_free() {
        let id = PostId::generate(at(1_700_000_000_000), [PostId::new(5)]);
        assert_eq!(id.get(), 1_700_000_000_000);
    }

    #[test]
    fn generate_bumps_past_collisions() {
        let now = at(1_700_000_000_000);
        let existing = [PostId::new(1_700_000_000_000), PostId::new(3)];
        assert_eq!(PostId::generate(now, existing).get(), 1_700_000_000_001);
    }

    #[test]
    fn generate_with_no_existing_posts() {
        assert_eq!(PostId::generate(at(42), []).get(), 42);
    }

    #[test]
    fn parse_lenient_accepts_integer_prefixes() {
        assert_eq!(PostId::parse_lenient("123"), Some(PostId::new(123)));
        assert_eq!(PostId::parse_lenient("  77"), Some(PostId::new(77)));
        assert_eq!(PostId::parse_lenient("+9"), Some(PostId::new(9)));
        assert_eq!(PostId::parse_lenient("12abc"), Some(PostId::new(12)));
        assert_eq!(PostId::parse_lenient("1e3"), Some(PostId::new(1)));
        assert_eq!(PostId::parse_lenient("-4"), Some(PostId::new(-4)));
    }

    #[test]
    fn parse_lenient_rejects_falsy_values() {
        assert_eq!(PostId::parse_lenient(""), None);
        assert_eq!(PostId::parse_lenient("abc"), None);
        assert_eq!(PostId::parse_lenient("0"), None);
        assert_eq!(PostId::parse_lenient("0x1A"), None);
        assert_eq!(PostId::parse_lenient("-"), None);
        assert_eq!(PostId::parse_lenient("99999999999999999999999"), None);
    }

    #[test]
    fn from_str_reports_input() {
        let err = "nope".parse::<PostId>().unwrap_err();
        assert_eq!(err, TypeError::InvalidPostId("nope".into()));
    }

    proptest! {
        #[test]
        fn parse_lenient_reads_back_display(raw in 1i64..i64::MAX) {
            let id = PostId::new(raw);
            prop_assert_eq!(PostId::parse_lenient(&id.to_string()), Some(id));
        }
    }

    // -----------------------------------------------------------------------
    // Post serialization
    // -----------------------------------------------------------------------

    #[test]
    fn post_json_matches_storage_layout() {
        let post = Post {
            id: PostId::new(1_710_000_000_000),
            title: "Hello".into(),
            content: "World".into(),
            image: None,
            date: at(1_710_000_000_000),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1_710_000_000_000_i64,
                "title": "Hello",
                "content": "World",
                "image": "",
                "date": "2024-03-09T16:00:00.000Z",
            })
        );
    }

    #[test]
    fn post_reads_blank_missing_and_null_image_as_none() {
        for image in [r#","image":"""#, "", r#","image":null"#] {
            let text = format!(
                r#"{{"id":1,"title":"t","content":"c"{image},"date":"2024-01-01T00:00:00.000Z"}}"#
            );
            let post: Post = serde_json::from_str(&text).unwrap();
            assert_eq!(post.image, None, "input: {text}");
        }
    }

    #[test]
    fn post_keeps_image_url() {
        let text = r#"{"id":1,"title":"t","content":"c","image":"https://x/y.png","date":"2024-01-01T00:00:00Z"}"#;
        let post: Post = serde_json::from_str(text).unwrap();
        assert_eq!(post.image.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn post_rejects_bad_date() {
        let text = r#"{"id":1,"title":"t","content":"c","image":"","date":"soon"}"#;
        assert!(serde_json::from_str::<Post>(text).is_err());
    }

    // -----------------------------------------------------------------------
    // PostDraft
    // -----------------------------------------------------------------------

    #[test]
    fn draft_trims_fields() {
        let draft = PostDraft::new("  Hello ", "\tWorld\n", "  ").unwrap();
        assert_eq!(draft.title(), "Hello");
        assert_eq!(draft.content(), "World");
        assert_eq!(draft.image(), None);
    }

    #[test]
    fn draft_requires_title_and_content() {
        assert_eq!(
            PostDraft::new("   ", "body", ""),
            Err(TypeError::EmptyField("title"))
        );
        assert_eq!(
            PostDraft::new("title", "", ""),
            Err(TypeError::EmptyField("content"))
        );
    }

    #[test]
    fn from_draft_carries_fields() {
        let draft = PostDraft::new("T", "C", " pic.png ").unwrap();
        let post = Post::from_draft(draft, PostId::new(7), at(0));
        assert_eq!(post.id, PostId::new(7));
        assert_eq!(post.image.as_deref(), Some("pic.png"));
    }
}
