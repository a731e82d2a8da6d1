//! Page model and output-location derivation

use chrono::{DateTime, FixedOffset};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use super::FrontMatter;
use crate::error::{Error, Result};

/// Name of the directory holding every category, relative to the publish root
pub const CATEGORY_DIR: &str = "categories";

/// Name of the directory holding every tag index, relative to the publish root
pub const TAG_DIR: &str = "tags";

/// File written into every output directory
pub const INDEX_FILE: &str = "index.html";

/// Glob patterns for item assets
const ASSET_PATTERNS: [&str; 2] = ["*.png", "*.jpg"];

/// Characters left alone in a link segment (RFC 3986 unreserved)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path segment of a link
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Link to a category index, relative to the site root
pub fn category_href(category: &str) -> String {
    format!("{}/{}", CATEGORY_DIR, encode_segment(category))
}

/// Link to a tag index, relative to the site root
pub fn tag_href(tag: &str) -> String {
    format!("{}/{}", TAG_DIR, encode_segment(tag))
}

/// Directory of a category index: `<root>/categories/<category>`
pub fn category_dir(publish_root: &Path, category: &str) -> PathBuf {
    publish_root.join(CATEGORY_DIR).join(category)
}

/// Directory of a tag index: `<root>/tags/<tag>`
pub fn tag_dir(publish_root: &Path, tag: &str) -> PathBuf {
    publish_root.join(TAG_DIR).join(tag)
}

/// Where a page is written. Only constructible from `(root, category, name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    directory: PathBuf,
    path: PathBuf,
    href: String,
}

impl OutputLocation {
    pub fn derive(publish_root: &Path, category: &str, name: &str) -> Self {
        let directory = category_dir(publish_root, category).join(name);
        let path = directory.join(INDEX_FILE);
        let href = format!("{}/{}", category_href(category), encode_segment(name));

        Self {
            directory,
            path,
            href,
        }
    }
}

/// Everything needed to turn a content file into a [`Page`]
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Directory holding one sub-directory per content item
    pub content_root: PathBuf,
    /// Destination of the generated site
    pub publish_root: PathBuf,
    /// Category for content without one
    pub default_category: String,
}

/// One content item
#[derive(Debug, Clone)]
pub struct Page {
    /// Name of the content item's directory
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub published_at: DateTime<FixedOffset>,
    /// Raw Markdown after the front-matter block
    pub body: String,
    /// Markdown file the page was read from
    pub source: PathBuf,
    /// Images found next to the source, copied on publish
    pub assets: Vec<PathBuf>,
    location: OutputLocation,
}

impl Page {
    /// Build a page from the raw text of its Markdown file.
    ///
    /// Reads nothing but the item's asset listing; never touches the output tree.
    pub fn new(name: &str, source: &Path, raw: &str, ctx: &BuildContext) -> Result<Self> {
        let (fm, body) = FrontMatter::parse(raw).map_err(Error::malformed(source))?;

        let category = fm
            .category
            .unwrap_or_else(|| ctx.default_category.clone());
        let location = OutputLocation::derive(&ctx.publish_root, &category, name);
        let assets = discover_assets(&ctx.content_root.join(name))?;

        Ok(Self {
            name: name.to_string(),
            title: fm.title,
            description: fm.description,
            category,
            tags: fm.tags,
            published_at: fm.date,
            body,
            source: source.to_path_buf(),
            assets,
            location,
        })
    }

    /// `<root>/categories/<category>/<name>`
    pub fn output_directory(&self) -> &Path {
        &self.location.directory
    }

    /// Always `output_directory()/index.html`
    pub fn output_path(&self) -> &Path {
        &self.location.path
    }

    /// `categories/<category>/<name>`, percent-encoded
    pub fn relative_href(&self) -> &str {
        &self.location.href
    }

    /// Newest first; ties broken by name, then source path, so the order is total
    pub fn newest_first(a: &Page, b: &Page) -> Ordering {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.source.cmp(&b.source))
    }

    /// Title, falling back to the item name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// List `*.png` / `*.jpg` files directly inside `dir`, sorted
fn discover_assets(dir: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let mut assets = Vec::new();

    for pattern in ASSET_PATTERNS {
        let paths = glob::glob(&format!("{}/{}", escaped, pattern)).map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, e),
        })?;
        for entry in paths {
            let path = entry.map_err(|e| Error::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if path.is_file() {
                assets.push(path);
            }
        }
    }

    assets.sort();
    Ok(assets)
}
