//! Foundation types for Inkpost.
//!
//! Every other Inkpost crate depends on `ink-types`. The records here are the
//! exact shapes persisted as JSON in the key-value store, so field names and
//! encodings are part of the storage format.
//!
//! # Key Types
//!
//! - [`PostId`] - Millisecond-timestamp identifier of a post
//! - [`Post`] - A blog entry (title, content, optional image, creation date)
//! - [`Comment`] - A reader note attached to exactly one post
//! - [`PostDraft`] / [`CommentDraft`] - Trimmed, validated form input

pub mod comment;
pub mod error;
pub mod post;
pub mod temporal;

pub use comment::{Comment, CommentDraft};
pub use error::TypeError;
pub use post::{Post, PostDraft, PostId};
