//! Page templates, built on the Tera template engine
//!
//! A default theme is embedded in the binary. A template directory given at startup
//! replaces any of its files by name.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{category_href, tag_href, Page};
use crate::error::{Error, Result};

pub const LAYOUT_TEMPLATE: &str = "layout.html";
pub const LIST_TEMPLATE: &str = "list.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const CATEGORY_TEMPLATE: &str = "category.html";
pub const TAG_TEMPLATE: &str = "tag.html";
pub const PAGE_TEMPLATE: &str = "page.html";

const BUILTIN: [(&str, &str); 6] = [
    (LAYOUT_TEMPLATE, include_str!("default/layout.html")),
    (LIST_TEMPLATE, include_str!("default/list.html")),
    (INDEX_TEMPLATE, include_str!("default/index.html")),
    (CATEGORY_TEMPLATE, include_str!("default/category.html")),
    (TAG_TEMPLATE, include_str!("default/tag.html")),
    (PAGE_TEMPLATE, include_str!("default/page.html")),
];

/// The compiled templates used for one build
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// The embedded default theme
    pub fn builtin() -> Result<Self> {
        Self::load(None)
    }

    /// Compile the templates, taking each file from `dir` when it exists there
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut sources = Vec::with_capacity(BUILTIN.len());
        for (name, builtin) in BUILTIN {
            let custom = dir.map(|d| d.join(name)).filter(|p| p.is_file());
            let source = match custom {
                Some(path) => {
                    tracing::debug!("Using template {:?}", path);
                    fs::read_to_string(&path).map_err(Error::io(&path))?
                }
                None => builtin.to_string(),
            };
            sources.push((name, source));
        }

        let mut tera = Tera::default();
        // Links and rendered Markdown go out verbatim; templates escape text with `| escape`
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(sources)?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            root: config.link_root().to_string(),
        }
    }
}

/// A category or tag name with its encoded link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkData {
    pub name: String,
    pub href: String,
}

impl LinkData {
    pub fn category(name: &str) -> Self {
        Self {
            name: name.to_string(),
            href: category_href(name),
        }
    }

    pub fn tag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            href: tag_href(name),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub category_href: String,
    pub tags: Vec<String>,
    pub tag_links: Vec<LinkData>,
    /// Human-readable date
    pub date: String,
    /// RFC 3339 timestamp
    pub published_at: String,
    pub href: String,
}

impl PageData {
    pub fn new(page: &Page, date_format: &str) -> Self {
        Self {
            name: page.name.clone(),
            title: page.display_title().to_string(),
            description: page.description.clone(),
            category: page.category.clone(),
            category_href: category_href(&page.category),
            tags: page.tags.clone(),
            tag_links: page.tags.iter().map(|t| LinkData::tag(t)).collect(),
            date: page.published_at.format(date_format).to_string(),
            published_at: page.published_at.to_rfc3339(),
            href: page.relative_href().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BuildContext;
    use std::path::PathBuf;

    fn sample_page() -> Page {
        let ctx = BuildContext {
            content_root: PathBuf::from("/nonexistent"),
            publish_root: PathBuf::from("public"),
            default_category: "Uncategorized".to_string(),
        };
        let raw = "+++\ntitle = \"Tom & Jerry\"\ndate = 2024-01-15T10:30:00Z\ncategory = \"blog\"\ntags = [\"cats\"]\n+++\n";
        Page::new("tom", Path::new("content/tom/index.md"), raw, &ctx).unwrap()
    }

    #[test]
    fn test_page_data() {
        let data = PageData::new(&sample_page(), "%A, %e %B %Y");
        assert_eq!(data.title, "Tom & Jerry");
        assert_eq!(data.date, "Monday, 15 January 2024");
        assert_eq!(data.published_at, "2024-01-15T10:30:00+00:00");
        assert_eq!(data.href, "categories/blog/tom");
        assert_eq!(data.category_href, "categories/blog");
        assert_eq!(data.tag_links, vec![LinkData::tag("cats")]);
    }

    #[test]
    fn test_links_encoded_in_page_template() {
        let ctx = BuildContext {
            content_root: PathBuf::from("/nonexistent"),
            publish_root: PathBuf::from("public"),
            default_category: "Uncategorized".to_string(),
        };
        let raw = "+++\ndate = \"2024-01-01\"\ncategory = \"Q&A\"\ntags = [\"C#\", \"50%\"]\n+++\n";
        let page = Page::new("why?", Path::new("content/why?/index.md"), raw, &ctx).unwrap();

        let templates = TemplateSet::builtin().unwrap();
        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&SiteConfig::default()));
        context.insert("categories", &vec![LinkData::category("Q&A")]);
        context.insert("page", &PageData::new(&page, "%Y-%m-%d"));
        context.insert("content", "");

        let html = templates.render(PAGE_TEMPLATE, &context).unwrap();
        assert!(html.contains("href=\"/tags/C%23/index.html\""));
        assert!(html.contains("href=\"/tags/50%25/index.html\""));
        assert!(html.contains("href=\"/categories/Q%26A/index.html\""));
        assert!(html.contains(">#C#</a>"));
        assert!(html.contains(">Q&amp;A</a>"));

        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&SiteConfig::default()));
        context.insert("categories", &Vec::<LinkData>::new());
        context.insert("pages", &vec![PageData::new(&page, "%Y-%m-%d")]);
        let html = templates.render(INDEX_TEMPLATE, &context).unwrap();
        assert!(html.contains("href=\"/categories/Q%26A/why%3F/index.html\""));
    }

    #[test]
    fn test_builtin_page_template() {
        let templates = TemplateSet::builtin().unwrap();
        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&SiteConfig::default()));
        context.insert("categories", &vec![LinkData::category("blog")]);
        context.insert("page", &PageData::new(&sample_page(), "%Y-%m-%d"));
        context.insert("content", "<p>Hello</p>");

        let html = templates.render(PAGE_TEMPLATE, &context).unwrap();
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("href=\"/tags/cats/index.html\""));
        assert!(html.contains("href=\"/categories/blog/index.html\""));
    }

    #[test]
    fn test_custom_template_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tag.html"), "custom {{ name }}").unwrap();

        let templates = TemplateSet::load(Some(dir.path())).unwrap();
        let mut context = Context::new();
        context.insert("name", "rust");
        assert_eq!(templates.render(TAG_TEMPLATE, &context).unwrap(), "custom rust");
    }

    #[test]
    fn test_broken_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "{% if %}").unwrap();
        assert!(matches!(
            TemplateSet::load(Some(dir.path())),
            Err(Error::Template(_))
        ));
    }
}
