//! Persistence for Inkpost.
//!
//! Posts and comments are kept as JSON text blobs in a string-keyed,
//! string-valued store, the same model as a browser's `localStorage`. This
//! crate provides the storage abstraction, two native backends, and the
//! [`BlogStore`] repository that every other layer goes through.
//!
//! # Storage Layout
//!
//! - `blogPosts` -- JSON array of posts, newest first
//! - `comments_<postId>` -- JSON array of that post's comments, append order
//!
//! # Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryKeyValueStore`] -- `BTreeMap`-based store for tests and embedding
//! - `FileKeyValueStore` -- single JSON file, rewritten atomically per write
//!   (not built for `wasm32`)
//!
//! # Design Rules
//!
//! 1. Every mutation rewrites the whole affected collection; there are no
//!    partial updates and no cross-key transactions.
//! 2. A missing key reads as an empty collection.
//! 3. A collection that fails to parse reads as empty (with a warning) unless
//!    the repository is in strict mode.
//! 4. Backend I/O errors are always propagated.

pub mod blog;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod keys;
pub mod memory;
pub mod traits;

pub use blog::BlogStore;
pub use error::{StoreError, StoreResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use traits::KeyValueStore;
