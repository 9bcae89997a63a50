//! Browser front-end for Inkpost.
//!
//! Compiled to `wasm32-unknown-unknown` and loaded by each of the three
//! pages. On start it reads `window.location`, lets the controller decide
//! what the page shows, reconciles the returned [`Node`](ink_render::Node)
//! trees into the document and wires the page's listener table with
//! `Closure`s. Posts and comments persist in `window.localStorage`, and
//! dates are shown in the viewer's locale.

mod app;
mod dates;
mod dom;
mod error;
mod storage;

pub use app::{start, WebApp};
pub use dates::LocaleDates;
pub use dom::Dom;
pub use error::WebError;
pub use storage::LocalStorage;
