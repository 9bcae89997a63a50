use thiserror::Error;

/// A user action that was refused.
///
/// The display text is the exact message shown to the user.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("Please enter both title and content.")]
    EmptyPostFields,

    #[error("Please enter both your name and comment.")]
    EmptyCommentFields,

    #[error("Invalid post ID.")]
    InvalidPostId,

    #[error("Post not found.")]
    PostNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(Rejection::PostNotFound.to_string(), "Post not found.");
        assert_eq!(Rejection::InvalidPostId.to_string(), "Invalid post ID.");
        assert_eq!(
            Rejection::EmptyPostFields.to_string(),
            "Please enter both title and content."
        );
        assert_eq!(
            Rejection::EmptyCommentFields.to_string(),
            "Please enter both your name and comment."
        );
    }
}
