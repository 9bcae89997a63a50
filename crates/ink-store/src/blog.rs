//! The post/comment repository.

use std::collections::HashSet;

use ink_types::{Comment, Post, PostId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::keys::{comments_key, parse_comments_key, POSTS_KEY};
use crate::traits::KeyValueStore;

/// Repository of posts and their comments over a [`KeyValueStore`].
///
/// Holds no cached records: every call reads or rewrites the persisted
/// collection it touches.
#[derive(Debug)]
pub struct BlogStore<S> {
    backend: S,
    strict: bool,
}

impl<S: KeyValueStore> BlogStore<S> {
    /// Wrap a backend. Corrupt collections read as empty.
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            strict: false,
        }
    }

    /// Surface corrupt collections as [`StoreError::Corrupt`] instead of
    /// reading them as empty.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The underlying key-value backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    // ---- Posts ----

    /// All posts, newest first. Empty when none are stored.
    pub fn list_posts(&self) -> StoreResult<Vec<Post>> {
        self.load(POSTS_KEY)
    }

    /// Look up a single post.
    pub fn find_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self.list_posts()?.into_iter().find(|post| post.id == id))
    }

    /// Prepend `post` and persist the collection.
    ///
    /// Fails with [`StoreError::Corrupt`] when the stored collection cannot
    /// be decoded, whatever the strict setting.
    pub fn add_post(&self, post: Post) -> StoreResult<()> {
        let mut posts = self.load_for_update(POSTS_KEY)?;
        let id = post.id;
        posts.insert(0, post);
        self.save(POSTS_KEY, &posts)?;
        info!(post = %id, total = posts.len(), "post added");
        Ok(())
    }

    /// Remove the first post with `id`. Returns `false` (and writes
    /// nothing) when no post matches. Corrupt collections are never
    /// rewritten.
    pub fn remove_post(&self, id: PostId) -> StoreResult<bool> {
        let mut posts: Vec<Post> = self.load_for_update(POSTS_KEY)?;
        let Some(index) = posts.iter().position(|post| post.id == id) else {
            debug!(post = %id, "remove_post: no match");
            return Ok(false);
        };
        posts.remove(index);
        self.save(POSTS_KEY, &posts)?;
        info!(post = %id, remaining = posts.len(), "post removed");
        Ok(true)
    }

    // ---- Comments ----

    /// Comments of `post_id` in append order. Empty when none are stored.
    pub fn list_comments(&self, post_id: PostId) -> StoreResult<Vec<Comment>> {
        self.load(&comments_key(post_id))
    }

    /// Overwrite the comment collection of `post_id`.
    pub fn replace_comments(&self, post_id: PostId, comments: &[Comment]) -> StoreResult<()> {
        self.save(&comments_key(post_id), comments)
    }

    /// Append one comment and return the updated collection. Corrupt
    /// collections are never rewritten.
    pub fn append_comment(&self, post_id: PostId, comment: Comment) -> StoreResult<Vec<Comment>> {
        let mut comments = self.load_for_update(&comments_key(post_id))?;
        comments.push(comment);
        self.replace_comments(post_id, &comments)?;
        Ok(comments)
    }

    /// Delete the comment collection of `post_id`. Returns `true` if one
    /// existed.
    pub fn remove_comments(&self, post_id: PostId) -> StoreResult<bool> {
        let removed = self.backend.remove_item(&comments_key(post_id))?;
        if removed {
            debug!(post = %post_id, "comment collection removed");
        }
        Ok(removed)
    }

    /// Post ids that have a comment collection but no post.
    ///
    /// An undecodable post collection is an error here: reading it as empty
    /// would mark every comment collection as orphaned.
    pub fn orphaned_comment_keys(&self) -> StoreResult<Vec<PostId>> {
        let posts: Vec<Post> = self.load_for_update(POSTS_KEY)?;
        let live: HashSet<PostId> = posts.iter().map(|post| post.id).collect();
        let mut orphans: Vec<PostId> = self
            .backend
            .keys()?
            .iter()
            .filter_map(|key| parse_comments_key(key))
            .filter(|id| !live.contains(id))
            .collect();
        orphans.sort();
        Ok(orphans)
    }

    /// Delete every orphaned comment collection. Returns how many were
    /// removed.
    pub fn sweep_orphaned_comments(&self) -> StoreResult<usize> {
        let mut removed = 0;
        for id in self.orphaned_comment_keys()? {
            if self.remove_comments(id)? {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "swept orphaned comment collections");
        }
        Ok(removed)
    }

    // ---- Encoding ----

    /// Read a collection for display. Corruption is tolerated unless strict.
    fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        self.decode(key, self.strict)
    }

    /// Read a collection that is about to be rewritten. Always strict.
    fn load_for_update<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        self.decode(key, true)
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, strict: bool) -> StoreResult<Vec<T>> {
        let Some(text) = self.backend.get_item(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Option<Vec<T>>>(&text) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(e) if strict => Err(StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => {
                warn!(key, error = %e, "corrupt collection read as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let text =
            serde_json::to_string(items).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.set_item(key, &text)?;
        debug!(key, count = items.len(), bytes = text.len(), "collection written");
        Ok(())
    }
}
