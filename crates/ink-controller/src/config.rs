use std::path::Path;

use ink_render::{PageLinks, RenderOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File names of the three pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    pub list: String,
    pub create: String,
    pub detail: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            list: "index.html".into(),
            create: "create-post.html".into(),
            detail: "post.html".into(),
        }
    }
}

impl Routes {
    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("list", &self.list),
            ("create", &self.create),
            ("detail", &self.detail),
        ];
        for (name, route) in named {
            if route.is_empty() {
                return Err(ConfigError::InvalidRoute {
                    name,
                    reason: "must not be empty".into(),
                });
            }
            let bad = route
                .chars()
                .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace());
            if let Some(ch) = bad {
                return Err(ConfigError::InvalidRoute {
                    name,
                    reason: format!("must be a bare file name, found {ch:?}"),
                });
            }
        }
        if self.list == self.create || self.list == self.detail || self.create == self.detail {
            return Err(ConfigError::InvalidRoute {
                name: "routes",
                reason: "page names must be distinct".into(),
            });
        }
        Ok(())
    }
}

/// Top-level configuration.
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Delete a post's comment collection together with the post.
    pub cascade_delete: bool,
    /// Report corrupt stored collections instead of reading them as empty.
    pub strict_storage: bool,
    pub routes: Routes,
    pub render: RenderOptions,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            cascade_delete: true,
            strict_storage: false,
            routes: Routes::default(),
            render: RenderOptions::default(),
        }
    }
}

impl BlogConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routes.validate()?;
        self.render.validate()?;
        Ok(())
    }

    /// Link targets for the renderer.
    pub fn page_links(&self) -> PageLinks {
        PageLinks {
            create: self.routes.create.clone(),
            detail: self.routes.detail.clone(),
        }
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
