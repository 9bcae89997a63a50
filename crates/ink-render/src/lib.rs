//! Rendering for Inkpost.
//!
//! Rendering is a pure projection: records go in, a [`Node`] tree comes out.
//! Nothing here touches storage or a document. Front-ends reconcile the tree
//! into whatever they display on: the web crate builds DOM nodes from it, the
//! terminal front-end prints its HTML serialization or its text content.
//!
//! # Modules
//!
//! - [`node`] - The element tree and its builder API
//! - [`html`] - Escaped HTML serialization of a tree
//! - [`options`] - Snippet length, date pattern and time zone settings
//! - [`views`] - The post list, post detail and comment list projections

pub mod error;
pub mod html;
pub mod node;
pub mod options;
pub mod views;

pub use error::RenderError;
pub use html::{to_html, Html};
pub use node::{Element, Node};
pub use options::{DateFormatter, PageLinks, RenderOptions, TimeZoneMode};
pub use views::{snippet, Renderer, COMMENTS_PLACEHOLDER, POSTS_PLACEHOLDER};
