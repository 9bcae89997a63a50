use ink_render::Node;
use ink_types::PostId;

/// Elements whose whole content the controller replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    PostList,
    PostDetail,
    Comments,
}

impl Container {
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::PostList => "posts-container",
            Self::PostDetail => "full-post-container",
            Self::Comments => "comments-container",
        }
    }
}

/// Form inputs the controller reads or clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Content,
    Image,
    CommentAuthor,
    CommentText,
}

impl Field {
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Title => "title1",
            Self::Content => "content",
            Self::Image => "image",
            Self::CommentAuthor => "comment-author",
            Self::CommentText => "comment-text",
        }
    }
}

/// A change for the front-end to apply, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Replace the content of `container` with `nodes`.
    Render { container: Container, nodes: Vec<Node> },
    /// Remove the card of one post from the list container in place.
    RemovePostCard(PostId),
    /// Reset form inputs to empty.
    ClearFields(Vec<Field>),
    /// Blocking notification.
    Alert(String),
    /// Leave the page for another location.
    Navigate(String),
}

impl Effect {
    pub fn alert(message: impl ToString) -> Self {
        Self::Alert(message.to_string())
    }

    /// Returns `true` for [`Effect::Navigate`].
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigate(_))
    }
}
