use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Which zone dates are displayed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    /// The viewer's local zone.
    #[default]
    Local,
    Utc,
}

/// Presentation settings for the views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Number of characters of content shown in a post card.
    pub snippet_chars: usize,
    /// `strftime` pattern for displayed dates. The default is the en-US
    /// short date (`3/9/2024`).
    pub date_format: String,
    pub time_zone: TimeZoneMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            snippet_chars: 100,
            date_format: "%-m/%-d/%Y".into(),
            time_zone: TimeZoneMode::Local,
        }
    }
}

impl RenderOptions {
    /// Reject settings that would fail at render time.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.snippet_chars == 0 {
            return Err(RenderError::ZeroSnippetLength);
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(RenderError::InvalidDateFormat {
                pattern: self.date_format.clone(),
            });
        }
        Ok(())
    }

    /// Format a timestamp for display.
    ///
    /// An unusable pattern falls back to the ISO calendar date rather than
    /// failing the whole render.
    pub fn format_date(&self, at: &DateTime<Utc>) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let written = match self.time_zone {
            TimeZoneMode::Utc => write!(out, "{}", at.format(&self.date_format)),
            TimeZoneMode::Local => {
                write!(out, "{}", at.with_timezone(&Local).format(&self.date_format))
            }
        };
        if written.is_err() {
            return at.format("%Y-%m-%d").to_string();
        }
        out
    }
}

/// Turns a timestamp into the text shown next to posts and comments.
///
/// [`RenderOptions`] is the default implementation; a front-end with access
/// to the viewer's locale can supply its own.
pub trait DateFormatter: Send + Sync {
    fn format(&self, at: &DateTime<Utc>) -> String;
}

impl DateFormatter for RenderOptions {
    fn format(&self, at: &DateTime<Utc>) -> String {
        self.format_date(at)
    }
}

impl<F: Fn(&DateTime<Utc>) -> String + Send + Sync> DateFormatter for F {
    fn format(&self, at: &DateTime<Utc>) -> String {
        self(at)
    }
}

/// Targets of the links the views emit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLinks {
    /// Post creation page, linked from the empty list placeholder.
    pub create: String,
    /// Post detail page; the post id is passed as the `id` query parameter.
    pub detail: String,
}

impl Default for PageLinks {
    fn default() -> Self {
        Self {
            create: "create-post.html".into(),
            detail: "post.html".into(),
        }
    }
}

impl PageLinks {
    /// Link to the detail page of `id`.
    pub fn detail_href(&self, id: impl std::fmt::Display) -> String {
        format!("{}?id={id}", self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(pattern: &str) -> RenderOptions {
        RenderOptions {
            date_format: pattern.into(),
            time_zone: TimeZoneMode::Utc,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn default_is_us_short_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(utc("%-m/%-d/%Y").format_date(&at), "3/9/2024");
        assert_eq!(RenderOptions::default().snippet_chars, 100);
    }

    #[test]
    fn custom_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(utc("%d.%m.%Y").format_date(&at), "09.03.2024");
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert_eq!(
            utc("%Q").validate(),
            Err(RenderError::InvalidDateFormat { pattern: "%Q".into() })
        );
        let zero = RenderOptions {
            snippet_chars: 0,
            ..RenderOptions::default()
        };
        assert_eq!(zero.validate(), Err(RenderError::ZeroSnippetLength));
        assert!(RenderOptions::default().validate().is_ok());
    }

    #[test]
    fn bad_pattern_falls_back_to_iso_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(utc("%Q").format_date(&at), "2024-03-09");
    }

    #[test]
    fn detail_href_appends_id() {
        assert_eq!(PageLinks::default().detail_href(42), "post.html?id=42");
    }
}
