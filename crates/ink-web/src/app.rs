use std::rc::Rc;

use ink_controller::{
    BlogConfig, ClickTarget, CommentForm, Controller, Effect, Field, Handler, Listener, Location,
    PostForm,
};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, Window};

use crate::dates::LocaleDates;
use crate::dom::{class_list, Dom};
use crate::error::WebError;
use crate::storage::LocalStorage;

/// Entry point run by the generated JavaScript glue once the module loads.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    WebApp::new(BlogConfig::default())?.run()?;
    Ok(())
}

/// One loaded page: the document, its location and the controller.
#[derive(Clone)]
pub struct WebApp {
    window: Window,
    dom: Dom,
    location: Location,
    controller: Rc<Controller<LocalStorage>>,
}

impl WebApp {
    /// Bind to the current window and `localStorage`.
    pub fn new(config: BlogConfig) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document = window.document().ok_or(WebError::DomUnavailable)?;
        let href = window.location().href()?;
        Ok(Self {
            location: Location::parse(&href)?,
            dom: Dom::new(document),
            controller: Rc::new(
                Controller::new(LocalStorage::open()?, config).with_date_formatter(LocaleDates),
            ),
            window,
        })
    }

    /// Apply the page's load effects, then wire its listeners.
    pub fn run(&self) -> Result<(), WebError> {
        let load = self.controller.load(&self.location)?;
        self.apply(&load.effects)?;
        if load.redirected() {
            return Ok(());
        }
        let Some(page) = load.page else {
            debug!(location = self.location.as_str(), "not an Inkpost page");
            return Ok(());
        };
        for listener in page.listeners() {
            self.attach(*listener)?;
        }
        Ok(())
    }

    fn attach(&self, listener: Listener) -> Result<(), WebError> {
        let target = self.dom.element(listener.target)?;
        let app = self.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Err(err) = app.dispatch(listener, &event) {
                web_sys::console::error_1(&err.to_string().into());
            }
        });
        target.add_event_listener_with_callback(
            listener.event.name(),
            callback.as_ref().unchecked_ref(),
        )?;
        // Listeners live as long as the page.
        callback.forget();
        Ok(())
    }

    fn dispatch(&self, listener: Listener, event: &Event) -> Result<(), WebError> {
        let effects = match listener.handler {
            Handler::CreatePost => {
                event.prevent_default();
                let form = PostForm {
                    title: self.dom.field_value(Field::Title)?,
                    content: self.dom.field_value(Field::Content)?,
                    image: self.dom.field_value(Field::Image)?,
                };
                self.controller.create_post(&form)?
            }
            Handler::AddComment => {
                event.prevent_default();
                let form = CommentForm {
                    author: self.dom.field_value(Field::CommentAuthor)?,
                    text: self.dom.field_value(Field::CommentText)?,
                };
                self.controller.add_comment(&self.location, &form)?
            }
            Handler::DeletePost => {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return Ok(());
                };
                let click = ClickTarget {
                    classes: class_list(&target.class_name()),
                    data_id: target.get_attribute("data-id"),
                };
                let window = self.window.clone();
                let mut confirm =
                    move |message: &str| window.confirm_with_message(message).unwrap_or(false);
                self.controller.delete_post(&click, &mut confirm)?
            }
        };
        self.apply(&effects)
    }

    /// Apply effects in order. Navigation ends the sequence.
    fn apply(&self, effects: &[Effect]) -> Result<(), WebError> {
        for effect in effects {
            match effect {
                Effect::Render { container, nodes } => self.dom.render(*container, nodes)?,
                Effect::RemovePostCard(id) => {
                    if !self.dom.remove_post_card(*id)? {
                        debug!(post = %id, "card already gone");
                    }
                }
                Effect::ClearFields(fields) => {
                    for field in fields {
                        self.dom.clear_field(*field)?;
                    }
                }
                Effect::Alert(message) => self.window.alert_with_message(message)?,
                Effect::Navigate(href) => {
                    self.window.location().set_href(href)?;
                    break;
                }
            }
        }
        Ok(())
    }
}
