use chrono::{DateTime, Utc};
use ink_render::DateFormatter;
use wasm_bindgen::JsValue;

/// Short dates in the viewer's locale, via `Date.prototype.toLocaleDateString`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocaleDates;

impl DateFormatter for LocaleDates {
    fn format(&self, at: &DateTime<Utc>) -> String {
        let date = js_sys::Date::new(&JsValue::from_f64(at.timestamp_millis() as f64));
        String::from(date.to_locale_date_string("default", &JsValue::UNDEFINED))
    }
}
