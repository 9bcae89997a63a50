//! Controller for Inkpost pages.
//!
//! The controller is the glue between user events and the store. It never
//! touches a document: each entry point returns a list of [`Effect`]s that a
//! front-end applies in order.
//!
//! # Flow
//!
//! 1. A front-end parses the current [`Location`] and calls
//!    [`Controller::load`], which resolves the [`Page`] once and returns the
//!    initial render effects.
//! 2. The front-end wires the page's [`Listener`] table
//!    ([`Page::listeners`]).
//! 3. Each event is forwarded to the handler the table names
//!    ([`Controller::create_post`], [`Controller::add_comment`],
//!    [`Controller::delete_post`]); the returned effects are applied.
//!
//! User mistakes (empty fields, bad ids, unknown posts) are not errors: they
//! become alert and navigation effects. [`ControllerError`] is reserved for
//! storage and configuration failures.

pub mod clock;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod page;
pub mod rejection;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BlogConfig, Routes};
pub use controller::{ClickTarget, CommentForm, Confirm, Controller, PageLoad, PostForm};
pub use effect::{Container, Effect, Field};
pub use error::{ConfigError, ControllerError, ControllerResult};
pub use page::{EventKind, Handler, Listener, Location, Page};
pub use rejection::Rejection;
