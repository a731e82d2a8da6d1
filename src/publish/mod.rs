//! Writes a built site to disk as HTML

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::Context;
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Page, INDEX_FILE};
use crate::error::{Error, Result};
use crate::site::{CategoryIndex, Publish, TagIndex};
use crate::templates::{
    ConfigData, LinkData, PageData, TemplateSet, CATEGORY_TEMPLATE, INDEX_TEMPLATE, PAGE_TEMPLATE,
    TAG_TEMPLATE,
};

/// Directory under the publish root receiving static files
pub const STATIC_DIR: &str = "static";

/// Renders through Tera templates and writes under `root`
pub struct HtmlPublisher {
    root: PathBuf,
    config: SiteConfig,
    templates: TemplateSet,
    markdown: MarkdownRenderer,
}

impl HtmlPublisher {
    pub fn new(root: impl Into<PathBuf>, config: SiteConfig, templates: TemplateSet) -> Self {
        let markdown = MarkdownRenderer::with_options(&config.markdown);
        Self {
            root: root.into(),
            config,
            templates,
            markdown,
        }
    }

    /// Create a base context with common variables
    fn base_context(&self, categories: &[String]) -> Context {
        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&self.config));
        let links: Vec<LinkData> = categories.iter().map(|c| LinkData::category(c)).collect();
        context.insert("categories", &links);
        context
    }

    fn page_list(&self, pages: &[Arc<Page>]) -> Vec<PageData> {
        pages
            .iter()
            .map(|p| PageData::new(p, &self.config.date_format))
            .collect()
    }

    fn render_to(&self, template: &str, context: &Context, output_path: &Path) -> Result<()> {
        let html = self.templates.render(template, context)?;
        write_file(output_path, html.as_bytes())
    }
}

impl Publish for HtmlPublisher {
    fn publish_category(&self, category: &CategoryIndex, categories: &[String]) -> Result<()> {
        let mut context = self.base_context(categories);
        context.insert("name", &category.name);
        context.insert("pages", &self.page_list(&category.pages));
        self.render_to(CATEGORY_TEMPLATE, &context, &category.output_path(&self.root))
    }

    fn publish_tag(&self, tag: &TagIndex, categories: &[String]) -> Result<()> {
        let mut context = self.base_context(categories);
        context.insert("name", &tag.name);
        context.insert("pages", &self.page_list(&tag.pages));
        self.render_to(TAG_TEMPLATE, &context, &tag.output_path(&self.root))
    }

    fn publish_page(&self, page: &Page, categories: &[String]) -> Result<()> {
        let base_dir = page.source.parent().unwrap_or(Path::new("."));
        let content = self.markdown.render(&page.body, base_dir);

        let mut context = self.base_context(categories);
        context.insert("page", &PageData::new(page, &self.config.date_format));
        context.insert("content", &content);
        self.render_to(PAGE_TEMPLATE, &context, page.output_path())?;

        for asset in &page.assets {
            let Some(file_name) = asset.file_name() else {
                continue;
            };
            let dest = page.output_directory().join(file_name);
            fs::copy(asset, &dest).map_err(Error::io(asset))?;
            tracing::debug!("Copied {:?} -> {:?}", asset, dest);
        }

        Ok(())
    }

    fn publish_home(&self, pages: &[Arc<Page>], categories: &[String]) -> Result<()> {
        let mut context = self.base_context(categories);
        context.insert("pages", &self.page_list(pages));
        self.render_to(INDEX_TEMPLATE, &context, &self.root.join(INDEX_FILE))
    }
}

/// Write `bytes` to `path`, creating parent directories
fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
    fs::write(path, bytes).map_err(Error::io(path))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

/// Copy everything under `source` into `<publish_root>/static/`, keeping sub-directories.
/// Returns the number of files copied.
pub fn copy_static(source: &Path, publish_root: &Path) -> Result<usize> {
    let dest_root = publish_root.join(STATIC_DIR);
    fs::create_dir_all(&dest_root).map_err(Error::io(&dest_root))?;

    let mut copied = 0;
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(source).unwrap_or(path);
        let dest = dest_root.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(Error::io(parent))?;
        }
        fs::copy(path, &dest).map_err(Error::io(path))?;
        copied += 1;
    }

    tracing::info!("Copied {} static files", copied);
    Ok(copied)
}
