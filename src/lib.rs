//! catpress: a static site generator for Markdown content grouped by category and tag
//!
//! Content lives at `<content>/<item>/<file>.md`, each file opening with a `+++`
//! delimited TOML block. The generated site has a homepage, one index per category
//! and per tag, and one page per item under `categories/<category>/<item>/`.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod publish;
pub mod site;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use content::BuildContext;
use publish::HtmlPublisher;
use site::Site;
use templates::TemplateSet;

/// The main catpress application
#[derive(Debug, Clone)]
pub struct Press {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Content directory, one sub-directory per item
    pub content_dir: PathBuf,
    /// Output directory
    pub publish_dir: PathBuf,
    /// Directory overriding the built-in templates
    pub templates_dir: Option<PathBuf>,
    /// Directory copied verbatim to `<publish>/static`
    pub static_dir: Option<PathBuf>,
}

impl Press {
    /// Validate the inputs. Nothing is written; the publish directory may not hold any input.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(content_dir: P, publish_dir: Q) -> Result<Self> {
        let content_dir = content_dir.as_ref().to_path_buf();
        if !content_dir.is_dir() {
            return Err(Error::Usage(format!(
                "content directory {:?} does not exist or is not a directory",
                content_dir
            )));
        }
        let publish_dir = publish_dir.as_ref().to_path_buf();
        check_not_inside(&publish_dir, &content_dir, "content")?;

        // `static/` next to the content directory, if there is one
        let static_dir = content_dir
            .parent()
            .map(|parent| parent.join("static"))
            .filter(|dir| dir.is_dir())
            .filter(|dir| !resolve(dir).starts_with(resolve(&publish_dir)));

        Ok(Self {
            config: config::SiteConfig::default(),
            content_dir,
            publish_dir,
            templates_dir: None,
            static_dir,
        })
    }

    /// Load site configuration from a TOML file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = config::SiteConfig::load(path)?;
        Ok(self)
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        check_not_inside(&self.publish_dir, &dir, "template")?;
        self.templates_dir = Some(dir);
        Ok(self)
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        check_not_inside(&self.publish_dir, &dir, "static")?;
        self.static_dir = Some(dir);
        Ok(self)
    }

    pub fn build_context(&self) -> BuildContext {
        BuildContext {
            content_root: self.content_dir.clone(),
            publish_root: self.publish_dir.clone(),
            default_category: self.config.default_category.clone(),
        }
    }

    /// Read all content and assemble the site
    pub fn build(&self) -> Result<Site> {
        Site::load(&self.build_context())
    }

    /// Write a built site into the publish directory
    pub fn publish(&self, site: &Site) -> Result<()> {
        let templates = TemplateSet::load(self.templates_dir.as_deref())?;
        let publisher = HtmlPublisher::new(&self.publish_dir, self.config.clone(), templates);
        site.publish(&publisher)
    }

    /// Build, publish and copy static files
    pub fn generate(&self) -> Result<commands::generate::Summary> {
        commands::generate::run(self)
    }

    /// Remove the publish directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

/// Refuse a publish directory equal to or above an input directory, which `--clean` would delete
fn check_not_inside(publish_dir: &Path, input: &Path, what: &str) -> Result<()> {
    if resolve(input).starts_with(resolve(publish_dir)) {
        return Err(Error::Usage(format!(
            "publish directory {:?} would contain the {} directory {:?}",
            publish_dir, what, input
        )));
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and append the rest
fn resolve(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(base) = current.canonicalize() {
            return missing.iter().rev().fold(base, |acc, name| acc.join(name));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                current = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            _ => return path.to_path_buf(),
        }
    }
}
