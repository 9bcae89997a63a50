use ink_render::{DateFormatter, Renderer};
use ink_store::{BlogStore, KeyValueStore};
use ink_types::{Comment, CommentDraft, Post, PostDraft, PostId};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::BlogConfig;
use crate::effect::{Container, Effect, Field};
use crate::error::ControllerResult;
use crate::page::{Location, Page};
use crate::rejection::Rejection;

/// Raw values of the post creation form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub image: String,
}

/// Raw values of the comment form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentForm {
    pub author: String,
    pub text: String,
}

/// The element a click landed on inside the post list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub classes: Vec<String>,
    /// Value of the `data-id` attribute.
    pub data_id: Option<String>,
}

impl ClickTarget {
    /// A click on the delete control whose `data-id` is `id`.
    pub fn delete_control(id: impl ToString) -> Self {
        Self {
            classes: vec![DELETE_CONTROL_CLASS.to_string()],
            data_id: Some(id.to_string()),
        }
    }

    fn is_delete_control(&self) -> bool {
        self.classes.iter().any(|c| c == DELETE_CONTROL_CLASS)
    }
}

const DELETE_CONTROL_CLASS: &str = "delete-btn";
const DELETE_PROMPT: &str = "Are you sure you want to delete this post?";
const DELETE_SUCCESS: &str = "Post deleted successfully.";

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Result of loading a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLoad {
    /// The resolved page; `None` for locations outside the site.
    pub page: Option<Page>,
    pub effects: Vec<Effect>,
}

impl PageLoad {
    /// Returns `true` when loading redirected away, in which case no
    /// listeners should be attached.
    pub fn redirected(&self) -> bool {
        self.effects.iter().any(Effect::is_navigation)
    }
}

/// Event handlers for every page, over an injected store.
pub struct Controller<S> {
    store: BlogStore<S>,
    renderer: Renderer,
    config: BlogConfig,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Build a controller over `backend`. The config is assumed validated.
    pub fn new(backend: S, config: BlogConfig) -> Self {
        let renderer = Renderer::new(config.render.clone(), config.page_links());
        Self {
            store: BlogStore::new(backend).strict(config.strict_storage),
            renderer,
            config,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace how displayed dates are formatted.
    pub fn with_date_formatter(mut self, dates: impl DateFormatter + 'static) -> Self {
        self.renderer = self.renderer.with_date_formatter(dates);
        self
    }

    pub fn store(&self) -> &BlogStore<S> {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    pub fn resolve(&self, location: &Location) -> Option<Page> {
        Page::resolve(location, &self.config.routes)
    }

    // ---- Page load ----

    /// Resolve the page and produce its initial effects.
    pub fn load(&self, location: &Location) -> ControllerResult<PageLoad> {
        let page = self.resolve(location);
        debug!(location = location.as_str(), ?page, "loading page");
        let effects = match page {
            Some(Page::List) => vec![self.render_post_list()?],
            Some(Page::Create) | None => Vec::new(),
            Some(Page::Detail) => match self.lookup_post(location)? {
                Ok(post) => vec![
                    Effect::Render {
                        container: Container::PostDetail,
                        nodes: self.renderer.render_post_detail(&post),
                    },
                    self.render_comments(post.id)?,
                ],
                Err(rejection) => self.redirect_to_list(rejection),
            },
        };
        Ok(PageLoad { page, effects })
    }

    // ---- Handlers ----

    /// Handle a submit of the post creation form.
    pub fn create_post(&self, form: &PostForm) -> ControllerResult<Vec<Effect>> {
        let Ok(draft) = PostDraft::new(&form.title, &form.content, &form.image) else {
            return Ok(vec![Effect::alert(Rejection::EmptyPostFields)]);
        };

        let now = self.clock.now();
        let existing = self.store.list_posts()?;
        let id = PostId::generate(now, existing.iter().map(|post| post.id));
        self.store.add_post(Post::from_draft(draft, id, now))?;
        info!(post = %id, "post created");

        Ok(vec![Effect::Navigate(self.config.routes.list.clone())])
    }

    /// Handle a submit of the comment form on the detail page at `location`.
    pub fn add_comment(
        &self,
        location: &Location,
        form: &CommentForm,
    ) -> ControllerResult<Vec<Effect>> {
        let post = match self.lookup_post(location)? {
            Ok(post) => post,
            Err(rejection) => return Ok(self.redirect_to_list(rejection)),
        };
        let Ok(draft) = CommentDraft::new(&form.author, &form.text) else {
            return Ok(vec![Effect::alert(Rejection::EmptyCommentFields)]);
        };

        let comments = self
            .store
            .append_comment(post.id, Comment::from_draft(draft, self.clock.now()))?;
        debug!(post = %post.id, total = comments.len(), "comment added");

        Ok(vec![
            Effect::ClearFields(vec![Field::CommentAuthor, Field::CommentText]),
            Effect::Render {
                container: Container::Comments,
                nodes: self.renderer.render_comment_list(&comments),
            },
        ])
    }

    /// Handle a click inside the post list.
    ///
    /// Clicks outside a delete control are ignored. Declining the
    /// confirmation changes nothing and produces no effects. Once the post
    /// is removed a failed comment cascade is logged, not returned: the
    /// comments stay behind as an orphan for `sweep`.
    pub fn delete_post(
        &self,
        target: &ClickTarget,
        confirm: &mut dyn Confirm,
    ) -> ControllerResult<Vec<Effect>> {
        if !target.is_delete_control() {
            return Ok(Vec::new());
        }
        let id = target.data_id.as_deref().and_then(PostId::parse_lenient);

        if !confirm.confirm(DELETE_PROMPT) {
            debug!(?id, "delete declined");
            return Ok(Vec::new());
        }

        let removed = match id {
            Some(id) => self.store.remove_post(id)?,
            None => false,
        };
        let Some(id) = id.filter(|_| removed) else {
            return Ok(vec![Effect::alert(Rejection::PostNotFound)]);
        };

        if self.config.cascade_delete {
            if let Err(err) = self.store.remove_comments(id) {
                warn!(post = %id, error = %err, "comment cascade failed");
            }
        }
        info!(post = %id, cascade = self.config.cascade_delete, "post deleted");

        let mut effects = vec![Effect::RemovePostCard(id), Effect::alert(DELETE_SUCCESS)];
        if self.store.list_posts()?.is_empty() {
            effects.push(Effect::Render {
                container: Container::PostList,
                nodes: vec![self.renderer.post_list_placeholder()],
            });
        }
        Ok(effects)
    }

    // ---- Helpers ----

    /// Find the post named by the location's `id` parameter.
    fn lookup_post(&self, location: &Location) -> ControllerResult<Result<Post, Rejection>> {
        let Some(id) = location.post_id() else {
            return Ok(Err(Rejection::InvalidPostId));
        };
        Ok(self.store.find_post(id)?.ok_or(Rejection::PostNotFound))
    }

    fn redirect_to_list(&self, rejection: Rejection) -> Vec<Effect> {
        debug!(%rejection, "redirecting to list page");
        vec![
            Effect::alert(rejection),
            Effect::Navigate(self.config.routes.list.clone()),
        ]
    }

    fn render_post_list(&self) -> ControllerResult<Effect> {
        let posts = self.store.list_posts()?;
        Ok(Effect::Render {
            container: Container::PostList,
            nodes: self.renderer.render_post_list(&posts),
        })
    }

    fn render_comments(&self, post_id: PostId) -> ControllerResult<Effect> {
        let comments = self.store.list_comments(post_id)?;
        Ok(Effect::Render {
            container: Container::Comments,
            nodes: self.renderer.render_comment_list(&comments),
        })
    }
}

impl<S> std::fmt::Debug for Controller<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, TimeZone, Utc};
    use ink_render::{to_html, TimeZoneMode};
    use ink_store::keys::comments_key;
    use ink_store::InMemoryKeyValueStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 16, 0, 0).unwrap()
    }

    fn config() -> BlogConfig {
        let mut config = BlogConfig::default();
        config.render.time_zone = TimeZoneMode::Utc;
        config
    }

    fn controller() -> Controller<InMemoryKeyValueStore> {
        Controller::new(InMemoryKeyValueStore::new(), config()).with_clock(FixedClock(now()))
    }

    fn location(href: &str) -> Location {
        Location::parse(href).unwrap()
    }

    fn post_form(title: &str, content: &str, image: &str) -> PostForm {
        PostForm {
            title: title.into(),
            content: content.into(),
            image: image.into(),
        }
    }

    fn create(c: &Controller<InMemoryKeyValueStore>, title: &str) -> PostId {
        c.create_post(&post_form(title, "body", "")).unwrap();
        c.store().list_posts().unwrap()[0].id
    }

    fn yes() -> impl FnMut(&str) -> bool {
        |_: &str| true
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[test]
    fn create_hello_world() {
        let c = controller();
        let effects = c.create_post(&post_form("Hello", "World", "")).unwrap();
        assert_eq!(effects, vec![Effect::Navigate("index.html".into())]);

        let posts = c.store().list_posts().unwrap();
        let first = &posts[0];
        assert_eq!(first.id, PostId::new(now().timestamp_millis()));
        assert_eq!(first.title, "Hello");
        assert_eq!(first.content, "World");
        assert_eq!(first.image, None);
        assert_eq!(first.date, now());

        let raw = c.store().backend().get_item("blogPosts").unwrap().unwrap();
        assert!(raw.contains(r#""image":"""#));

        let html = to_html(&c.renderer().render_post_list(&posts));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn create_trims_and_keeps_image() {
        let c = controller();
        c.create_post(&post_form("  T ", " C  ", " pic.png ")).unwrap();
        let post = &c.store().list_posts().unwrap()[0];
        assert_eq!(post.title, "T");
        assert_eq!(post.content, "C");
        assert_eq!(post.image.as_deref(), Some("pic.png"));
    }

    #[test]
    fn create_rejects_empty_fields_without_persisting() {
        let c = controller();
        for form in [post_form("", "x", ""), post_form("x", "   ", ""), post_form(" ", "", "img")] {
            let effects = c.create_post(&form).unwrap();
            assert_eq!(
                effects,
                vec![Effect::Alert("Please enter both title and content.".into())]
            );
        }
        assert!(c.store().list_posts().unwrap().is_empty());
        assert!(c.store().backend().is_empty().unwrap());
    }

    #[test]
    fn created_ids_are_unique_and_newest_first() {
        let c = controller();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(create(&c, &format!("p{i}")));
        }
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);

        let titles: Vec<String> = c.store().list_posts().unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["p4", "p3", "p2", "p1", "p0"]);
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    #[test]
    fn list_page_renders_posts() {
        let c = controller();
        create(&c, "First");
        let load = c.load(&location("index.html")).unwrap();
        assert_eq!(load.page, Some(Page::List));
        assert!(!load.redirected());
        match &load.effects[..] {
            [Effect::Render { container: Container::PostList, nodes }] => {
                assert_eq!(nodes.len(), 1);
                assert!(nodes[0].text_content().contains("First"));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn empty_list_page_renders_placeholder() {
        let load = controller().load(&location("/")).unwrap();
        match &load.effects[..] {
            [Effect::Render { nodes, .. }] => {
                assert!(nodes[0].text_content().starts_with("No posts available."));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn create_page_has_no_initial_effects() {
        let load = controller().load(&location("create-post.html")).unwrap();
        assert_eq!(load.page, Some(Page::Create));
        assert!(load.effects.is_empty());
    }

    #[test]
    fn unknown_page_does_nothing() {
        let load = controller().load(&location("about.html")).unwrap();
        assert_eq!(load.page, None);
        assert!(load.effects.is_empty());
    }

    #[test]
    fn detail_page_renders_post_and_comments() {
        let c = controller();
        let id = create(&c, "Detailed");
        let load = c.load(&location(&format!("post.html?id={id}"))).unwrap();
        assert_eq!(load.page, Some(Page::Detail));
        match &load.effects[..] {
            [Effect::Render { container: Container::PostDetail, nodes: detail }, Effect::Render { container: Container::Comments, nodes: comments }] =>
            {
                assert_eq!(detail[0].text_content(), "Detailed");
                assert!(comments[0].text_content().starts_with("No comments yet."));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn date_formatter_applies_to_rendered_comments() {
        let c = controller().with_date_formatter(|_: &DateTime<Utc>| "yesterday".to_string());
        let id = create(&c, "Post");
        let effects = c
            .add_comment(&location(&format!("post.html?id={id}")), &comment_form("Ada", "Hi"))
            .unwrap();
        match &effects[1] {
            Effect::Render { nodes, .. } => assert!(to_html(nodes).contains(" on yesterday")),
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn detail_page_with_unknown_id_redirects_without_rendering() {
        let c = controller();
        create(&c, "Other");
        let load = c.load(&location("post.html?id=999")).unwrap();
        assert_eq!(
            load.effects,
            vec![
                Effect::Alert("Post not found.".into()),
                Effect::Navigate("index.html".into()),
            ]
        );
        assert!(load.redirected());
    }

    #[test]
    fn detail_page_with_invalid_id_redirects() {
        let c = controller();
        for href in ["post.html", "post.html?id=", "post.html?id=abc", "post.html?id=0"] {
            let load = c.load(&location(href)).unwrap();
            assert_eq!(
                load.effects,
                vec![
                    Effect::Alert("Invalid post ID.".into()),
                    Effect::Navigate("index.html".into()),
                ],
                "href: {href}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    fn comment_form(author: &str, text: &str) -> CommentForm {
        CommentForm {
            author: author.into(),
            text: text.into(),
        }
    }

    #[test]
    fn add_comment_appends_clears_and_rerenders() {
        let c = controller();
        let id = create(&c, "Post");
        let loc = location(&format!("post.html?id={id}"));

        let effects = c.add_comment(&loc, &comment_form(" Ada ", " Lovely ")).unwrap();
        assert_eq!(effects[0], Effect::ClearFields(vec![Field::CommentAuthor, Field::CommentText]));
        match &effects[1] {
            Effect::Render { container: Container::Comments, nodes } => {
                assert_eq!(
                    to_html(nodes),
                    r#"<div class="comment"><strong>Ada</strong><span> on 3/9/2024</span><p>Lovely</p></div>"#
                );
            }
            other => panic!("unexpected effect: {other:?}"),
        }
        assert!(!effects.iter().any(Effect::is_navigation));

        let stored = c.store().list_comments(id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].author, "Ada");
        assert_eq!(stored[0].text, "Lovely");
    }

    #[test]
    fn add_comment_rejects_empty_fields() {
        let c = controller();
        let id = create(&c, "Post");
        let loc = location(&format!("post.html?id={id}"));
        let effects = c.add_comment(&loc, &comment_form("Ada", "  ")).unwrap();
        assert_eq!(
            effects,
            vec![Effect::Alert("Please enter both your name and comment.".into())]
        );
        assert!(c.store().list_comments(id).unwrap().is_empty());
    }

    #[test]
    fn add_comment_for_missing_post_redirects() {
        let c = controller();
        let effects = c
            .add_comment(&location("post.html?id=999"), &comment_form("Ada", "hi"))
            .unwrap();
        assert_eq!(effects[0], Effect::Alert("Post not found.".into()));
        assert_eq!(effects[1], Effect::Navigate("index.html".into()));
        assert!(!c.store().backend().contains_key(&comments_key(PostId::new(999))).unwrap());
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_ignores_other_click_targets() {
        let c = controller();
        create(&c, "Post");
        let target = ClickTarget {
            classes: vec!["read-more-btn".into()],
            data_id: None,
        };
        let mut asked = false;
        let effects = c
            .delete_post(&target, &mut |_: &str| {
                asked = true;
                true
            })
            .unwrap();
        assert!(effects.is_empty());
        assert!(!asked);
        assert_eq!(c.store().list_posts().unwrap().len(), 1);
    }

    #[test]
    fn declined_confirmation_is_silent_noop() {
        let c = controller();
        let id = create(&c, "Post");
        let mut prompt = None;
        let effects = c
            .delete_post(&ClickTarget::delete_control(id), &mut |message: &str| {
                prompt = Some(message.to_string());
                false
            })
            .unwrap();
        assert!(effects.is_empty());
        assert_eq!(prompt.as_deref(), Some("Are you sure you want to delete this post?"));
        assert_eq!(c.store().list_posts().unwrap().len(), 1);
    }

    #[test]
    fn delete_unknown_post_reports_not_found() {
        let c = controller();
        create(&c, "Post");
        let before = c.store().list_posts().unwrap();
        let effects = c
            .delete_post(&ClickTarget::delete_control(PostId::new(999)), &mut yes())
            .unwrap();
        assert_eq!(effects, vec![Effect::Alert("Post not found.".into())]);
        assert_eq!(c.store().list_posts().unwrap(), before);
    }

    #[test]
    fn delete_with_unparseable_id_reports_not_found() {
        let c = controller();
        let target = ClickTarget {
            classes: vec!["delete-btn".into()],
            data_id: Some("NaN".into()),
        };
        let effects = c.delete_post(&target, &mut yes()).unwrap();
        assert_eq!(effects, vec![Effect::Alert("Post not found.".into())]);
    }

    #[test]
    fn delete_removes_card_in_place() {
        let c = controller();
        let first = create(&c, "first");
        let second = create(&c, "second");
        let effects = c
            .delete_post(&ClickTarget::delete_control(first), &mut yes())
            .unwrap();
        assert_eq!(
            effects,
            vec![
                Effect::RemovePostCard(first),
                Effect::Alert("Post deleted successfully.".into()),
            ]
        );
        let remaining = c.store().list_posts().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }

    #[test]
    fn deleting_last_post_renders_placeholder() {
        let c = controller();
        let id = create(&c, "only");
        let effects = c.delete_post(&ClickTarget::delete_control(id), &mut yes()).unwrap();
        assert_eq!(effects.len(), 3);
        match &effects[2] {
            Effect::Render { container: Container::PostList, nodes } => {
                assert!(nodes[0].text_content().starts_with("No posts available."));
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn delete_cascades_to_comments_by_default() {
        let c = controller();
        let id = create(&c, "Post");
        c.add_comment(&location(&format!("post.html?id={id}")), &comment_form("a", "b"))
            .unwrap();
        c.delete_post(&ClickTarget::delete_control(id), &mut yes()).unwrap();
        assert!(!c.store().backend().contains_key(&comments_key(id)).unwrap());
    }

    /// Backend whose removals always fail.
    struct NoRemoval(InMemoryKeyValueStore);

    impl KeyValueStore for NoRemoval {
        fn get_item(&self, key: &str) -> ink_store::StoreResult<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> ink_store::StoreResult<()> {
            self.0.set_item(key, value)
        }

        fn remove_item(&self, _key: &str) -> ink_store::StoreResult<bool> {
            Err(ink_store::StoreError::Backend("removal refused".into()))
        }

        fn keys(&self) -> ink_store::StoreResult<Vec<String>> {
            self.0.keys()
        }
    }

    #[test]
    fn failed_cascade_still_removes_card() {
        let c = Controller::new(NoRemoval(InMemoryKeyValueStore::new()), config())
            .with_clock(FixedClock(now()));
        c.create_post(&post_form("Post", "body", "")).unwrap();
        let id = c.store().list_posts().unwrap()[0].id;
        c.add_comment(&location(&format!("post.html?id={id}")), &comment_form("a", "b"))
            .unwrap();

        let effects = c.delete_post(&ClickTarget::delete_control(id), &mut yes()).unwrap();
        assert_eq!(effects[0], Effect::RemovePostCard(id));
        assert_eq!(effects[1], Effect::Alert("Post deleted successfully.".into()));
        assert!(c.store().list_posts().unwrap().is_empty());
        assert_eq!(c.store().orphaned_comment_keys().unwrap(), vec![id]);
    }

    #[test]
    fn delete_without_cascade_leaves_comments() {
        let config = BlogConfig {
            cascade_delete: false,
            ..config()
        };
        let c = Controller::new(InMemoryKeyValueStore::new(), config).with_clock(FixedClock(now()));
        let id = create(&c, "Post");
        c.add_comment(&location(&format!("post.html?id={id}")), &comment_form("a", "b"))
            .unwrap();
        c.delete_post(&ClickTarget::delete_control(id), &mut yes()).unwrap();
        assert_eq!(c.store().orphaned_comment_keys().unwrap(), vec![id]);
    }
}
