use ink_controller::ControllerError;
use wasm_bindgen::{JsCast, JsValue};

/// Errors produced by the browser front-end.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g. outside a browser window).
    #[error("DOM is not available")]
    DomUnavailable,

    /// `window.localStorage` is missing or blocked.
    #[error("localStorage is not available")]
    StorageUnavailable,

    /// A page element the controller relies on is missing.
    #[error("failed to find DOM element with id `{0}`")]
    ElementNotFound(String),

    /// The element exists but holds no editable value.
    #[error("element `{0}` is not an input or textarea")]
    NotAFormField(String),

    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_message(&value))
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        js_sys::Error::new(&value.to_string()).into()
    }
}

/// Best-effort text of a thrown JavaScript value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
