//! Page identity, locations and the per-page listener table.

use ink_types::PostId;
use url::Url;

use crate::config::Routes;
use crate::effect::Container;
use crate::error::{ControllerError, ControllerResult};

/// Base against which relative locations such as `post.html?id=3` are
/// resolved.
const RELATIVE_BASE: &str = "http://localhost/";

/// Element ids of the page forms.
pub const POST_FORM_ID: &str = "post-form";
pub const COMMENT_FORM_ID: &str = "comment-form";

/// A navigation location: the page file name and its query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parse an absolute URL or a path relative to the site root.
    ///
    /// ```
    /// use ink_controller::Location;
    ///
    /// let loc = Location::parse("post.html?id=42").unwrap();
    /// assert_eq!(loc.page_name(), "post.html");
    /// assert_eq!(loc.query("id").as_deref(), Some("42"));
    /// ```
    pub fn parse(href: &str) -> ControllerResult<Self> {
        let invalid = |e: url::ParseError| ControllerError::InvalidLocation {
            location: href.to_string(),
            reason: e.to_string(),
        };
        let url = match Url::parse(href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
                .and_then(|base| base.join(href))
                .map_err(invalid)?,
            Err(e) => return Err(invalid(e)),
        };
        Ok(Self { url })
    }

    /// Final path segment; empty for a directory such as `/` or `/blog/`.
    pub fn page_name(&self) -> &str {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
    }

    /// First value of query parameter `name`, percent-decoded.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// The `id` query parameter read as a post id.
    pub fn post_id(&self) -> Option<PostId> {
        self.query("id").as_deref().and_then(PostId::parse_lenient)
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// The three pages of the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    List,
    Create,
    Detail,
}

impl Page {
    /// Resolve the page a location shows. An empty page name is the list
    /// page; unknown names resolve to `None`.
    pub fn resolve(location: &Location, routes: &Routes) -> Option<Self> {
        let name = location.page_name();
        if name.is_empty() || name == routes.list {
            Some(Self::List)
        } else if name == routes.create {
            Some(Self::Create)
        } else if name == routes.detail {
            Some(Self::Detail)
        } else {
            None
        }
    }

    /// File name of this page.
    pub fn route(self, routes: &Routes) -> &str {
        match self {
            Self::List => &routes.list,
            Self::Create => &routes.create,
            Self::Detail => &routes.detail,
        }
    }

    /// Listeners a front-end attaches once the page has loaded.
    pub fn listeners(self) -> &'static [Listener] {
        match self {
            Self::List => LIST_LISTENERS,
            Self::Create => CREATE_LISTENERS,
            Self::Detail => DETAIL_LISTENERS,
        }
    }
}

const LIST_LISTENERS: &[Listener] = &[Listener {
    target: Container::PostList.element_id(),
    event: EventKind::Click,
    handler: Handler::DeletePost,
}];

const CREATE_LISTENERS: &[Listener] = &[Listener {
    target: POST_FORM_ID,
    event: EventKind::Submit,
    handler: Handler::CreatePost,
}];

const DETAIL_LISTENERS: &[Listener] = &[Listener {
    target: COMMENT_FORM_ID,
    event: EventKind::Submit,
    handler: Handler::AddComment,
}];

/// DOM event kinds the pages listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

impl EventKind {
    /// DOM event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
        }
    }
}

/// Controller entry point an event is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    CreatePost,
    AddComment,
    DeletePost,
}

/// One row of a page's dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Listener {
    /// Element id the listener is attached to.
    pub target: &'static str,
    pub event: EventKind,
    pub handler: Handler,
}
