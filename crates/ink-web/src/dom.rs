//! Reconciling rendered trees and effects into the live document.

use ink_controller::{Container, Field};
use ink_render::Node;
use ink_types::PostId;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement};

use crate::error::WebError;

/// Class of the card that wraps one post in the list.
const CARD_CLASS: &str = "blog-post";

/// Handle on the page document.
#[derive(Debug, Clone)]
pub struct Dom {
    document: Document,
}

impl Dom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The element with `id`, or [`WebError::ElementNotFound`].
    pub fn element(&self, id: &str) -> Result<Element, WebError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| WebError::ElementNotFound(id.to_string()))
    }

    /// Replace everything inside `container` with `nodes`.
    pub fn render(&self, container: Container, nodes: &[Node]) -> Result<(), WebError> {
        let host = self.element(container.element_id())?;
        while let Some(child) = host.first_child() {
            host.remove_child(&child)?;
        }
        for node in nodes {
            host.append_child(&self.build(node)?)?;
        }
        Ok(())
    }

    /// Remove the list card holding the delete control of `id`.
    ///
    /// Returns `false` when no such card is on the page.
    pub fn remove_post_card(&self, id: PostId) -> Result<bool, WebError> {
        let Some(control) = self.document.query_selector(&delete_control_selector(id))? else {
            return Ok(false);
        };
        let card = match control.closest(&format!(".{CARD_CLASS}"))? {
            Some(card) => card,
            None => match control.parent_element() {
                Some(parent) => parent,
                None => return Ok(false),
            },
        };
        card.remove();
        Ok(true)
    }

    /// Current value of a form input.
    pub fn field_value(&self, field: Field) -> Result<String, WebError> {
        let element = self.element(field.element_id())?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            Ok(input.value())
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            Ok(area.value())
        } else {
            Err(WebError::NotAFormField(field.element_id().to_string()))
        }
    }

    /// Reset a form input to empty.
    pub fn clear_field(&self, field: Field) -> Result<(), WebError> {
        let element = self.element(field.element_id())?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value("");
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value("");
        } else {
            return Err(WebError::NotAFormField(field.element_id().to_string()));
        }
        Ok(())
    }

    fn build(&self, node: &Node) -> Result<web_sys::Node, WebError> {
        match node {
            Node::Text(text) => Ok(self.document.create_text_node(text).into()),
            Node::Element(element) => {
                let built = self.document.create_element(&element.tag)?;
                for (name, value) in &element.attributes {
                    built.set_attribute(name, value)?;
                }
                for child in &element.children {
                    built.append_child(&self.build(child)?)?;
                }
                Ok(built.into())
            }
        }
    }
}

/// CSS selector of the delete control for `id`.
pub(crate) fn delete_control_selector(id: PostId) -> String {
    format!(".delete-btn[data-id=\"{id}\"]")
}

/// Split a `className` string into its classes.
pub(crate) fn class_list(class_name: &str) -> Vec<String> {
    class_name.split_whitespace().map(str::to_string).collect()
}
