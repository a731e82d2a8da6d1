//! Site configuration (site.toml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    /// Prefix prepended to every generated link (e.g. "/blog")
    pub root: String,

    /// chrono format string for the human-readable page date
    pub date_format: String,

    /// Category given to content without a `category` field
    pub default_category: String,

    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "catpress".to_string(),
            description: String::new(),
            author: String::new(),
            root: String::new(),
            date_format: "%A, %e %B %Y".to_string(),
            default_category: "Uncategorized".to_string(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(Error::io(path))?;
        let config: SiteConfig = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Link root without a trailing slash, so templates can write `{{ root }}/{{ href }}`
    pub fn link_root(&self) -> &str {
        self.root.trim_end_matches('/')
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub highlight_theme: String,
    pub line_numbers: bool,
    /// Turn soft line breaks into `<br>`
    pub hard_wrap: bool,
    /// Drop raw HTML embedded in the Markdown source
    pub filter_html: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
            hard_wrap: true,
            filter_html: true,
        }
    }
}
