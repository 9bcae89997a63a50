//! Projections of posts and comments into element trees.
//!
//! Each view returns the full content of its container as a list of nodes;
//! the caller replaces whatever the container held before.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ink_types::{Comment, Post};

use crate::node::{Element, Node};
use crate::options::{DateFormatter, PageLinks, RenderOptions};

/// Text of the empty post list placeholder, before its link.
pub const POSTS_PLACEHOLDER: &str = "No posts available. ";

/// Text of the empty comment list placeholder.
pub const COMMENTS_PLACEHOLDER: &str = "No comments yet. Be the first to comment!";

/// Marker appended to truncated snippets.
const ELLIPSIS: &str = "...";

/// The first `limit` characters of `content`, with `...` appended when
/// anything was cut.
///
/// Characters are Unicode scalar values, so multi-byte text is never split.
///
/// ```
/// use ink_render::snippet;
///
/// assert_eq!(snippet("short", 100), "short");
/// assert_eq!(snippet("abcdef", 3), "abc...");
/// ```
pub fn snippet(content: &str, limit: usize) -> Cow<'_, str> {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &content[..cut])),
        None => Cow::Borrowed(content),
    }
}

/// Renders views with fixed options and link targets.
#[derive(Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
    links: PageLinks,
    dates: Option<Arc<dyn DateFormatter>>,
}

impl Renderer {
    pub fn new(options: RenderOptions, links: PageLinks) -> Self {
        Self {
            options,
            links,
            dates: None,
        }
    }

    /// Format displayed dates with `dates` instead of the configured
    /// `strftime` pattern.
    pub fn with_date_formatter(mut self, dates: impl DateFormatter + 'static) -> Self {
        self.dates = Some(Arc::new(dates));
        self
    }

    /// Display text for `at`.
    pub fn format_date(&self, at: &DateTime<Utc>) -> String {
        match &self.dates {
            Some(dates) => dates.format(at),
            None => self.options.format_date(at),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn links(&self) -> &PageLinks {
        &self.links
    }

    /// One summary card per post, or the "no posts" placeholder.
    pub fn render_post_list(&self, posts: &[Post]) -> Vec<Node> {
        if posts.is_empty() {
            return vec![self.post_list_placeholder()];
        }
        posts.iter().map(|post| self.post_card(post).into()).collect()
    }

    /// The "no posts" placeholder, linking to the creation page.
    pub fn post_list_placeholder(&self) -> Node {
        Element::new("p")
            .text(POSTS_PLACEHOLDER)
            .child(
                Element::new("a")
                    .attr("href", &self.links.create)
                    .text("Create the first post"),
            )
            .text(".")
            .into()
    }

    /// Title, date, optional image and the full content of one post.
    pub fn render_post_detail(&self, post: &Post) -> Vec<Node> {
        let mut nodes: Vec<Node> = vec![
            Element::new("h2").text(&post.title).into(),
            self.published_on(&post.date).into(),
        ];
        if let Some(image) = post_image(post) {
            nodes.push(image.into());
        }
        nodes.push(Element::new("p").text(&post.content).into());
        nodes
    }

    /// One block per comment, or the "no comments" placeholder.
    pub fn render_comment_list(&self, comments: &[Comment]) -> Vec<Node> {
        if comments.is_empty() {
            return vec![Element::new("p").text(COMMENTS_PLACEHOLDER).into()];
        }
        comments
            .iter()
            .map(|comment| {
                Element::new("div")
                    .class("comment")
                    .child(Element::new("strong").text(&comment.author))
                    .child(
                        Element::new("span")
                            .text(format!(" on {}", self.format_date(&comment.date))),
                    )
                    .child(Element::new("p").text(&comment.text))
                    .into()
            })
            .collect()
    }

    fn post_card(&self, post: &Post) -> Element {
        Element::new("div")
            .class("blog-post")
            .child(Element::new("h2").text(&post.title))
            .child(self.published_on(&post.date))
            .child_opt(post_image(post))
            .child(
                Element::new("p").text(snippet(&post.content, self.options.snippet_chars)),
            )
            .child(
                Element::new("a")
                    .class("read-more-btn")
                    .attr("href", self.links.detail_href(post.id))
                    .text("Read More"),
            )
            .child(
                Element::new("button")
                    .class("delete-btn")
                    .attr("data-id", post.id)
                    .text("Delete"),
            )
    }

    fn published_on(&self, date: &DateTime<Utc>) -> Element {
        Element::new("p").text("Published on ").child(
            Element::new("time")
                .attr("datetime", ink_types::temporal::format_iso(date))
                .text(self.format_date(date)),
        )
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("links", &self.links)
            .field("custom_dates", &self.dates.is_some())
            .finish()
    }
}

fn post_image(post: &Post) -> Option<Element> {
    post.image.as_deref().map(|src| {
        Element::new("img")
            .attr("src", src)
            .attr("alt", &post.title)
    })
}
