//! Storage key conventions.

use ink_types::PostId;

/// Key holding the post collection.
pub const POSTS_KEY: &str = "blogPosts";

/// Prefix of every per-post comment collection key.
pub const COMMENTS_PREFIX: &str = "comments_";

/// Key holding the comments of `post_id`.
///
/// ```
/// use ink_store::keys::comments_key;
/// use ink_types::PostId;
///
/// assert_eq!(comments_key(PostId::new(17)), "comments_17");
/// ```
pub fn comments_key(post_id: PostId) -> String {
    format!("{COMMENTS_PREFIX}{post_id}")
}

/// Recover the post id from a comment collection key.
///
/// Returns `None` for keys outside the comment namespace and for suffixes
/// that are not a plain integer.
pub fn parse_comments_key(key: &str) -> Option<PostId> {
    let suffix = key.strip_prefix(COMMENTS_PREFIX)?;
    suffix.parse::<i64>().ok().map(PostId::new)
}
