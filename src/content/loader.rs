//! Content loader - finds content items and turns them into pages

use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{BuildContext, Page};
use crate::error::{Error, Result};

/// A Markdown file found under the content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Name of the directory containing the file
    pub name: String,
    pub path: PathBuf,
}

/// Loads content from `<content_root>/<item>/*.md`
pub struct ContentLoader<'a> {
    ctx: &'a BuildContext,
}

impl<'a> ContentLoader<'a> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self { ctx }
    }

    /// Every Markdown file exactly one directory below the content root, sorted by path
    pub fn discover(&self) -> Result<Vec<ContentItem>> {
        let root = &self.ctx.content_root;
        let mut items = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(2)
            .max_depth(2)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io {
                path: e.path().unwrap_or(root.as_path()).to_path_buf(),
                source: io::Error::from(e),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let Some(name) = path
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };

            items.push(ContentItem {
                name,
                path: path.to_path_buf(),
            });
        }

        Ok(items)
    }

    /// Load every content item. The first malformed file aborts the whole load.
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let items = self.discover()?;
        tracing::debug!("Discovered {} content files", items.len());

        items.par_iter().map(|item| self.load_page(item)).collect()
    }

    /// Load a single page from a file
    pub fn load_page(&self, item: &ContentItem) -> Result<Page> {
        let raw = fs::read_to_string(&item.path).map_err(Error::io(&item.path))?;
        let page = Page::new(&item.name, &item.path, &raw, self.ctx)?;
        tracing::debug!("Loaded {:?} as {}", item.path, page.relative_href());
        Ok(page)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn ctx(root: &Path) -> BuildContext {
        BuildContext {
            content_root: root.to_path_buf(),
            publish_root: root.join("public"),
            default_category: "Uncategorized".to_string(),
        }
    }

    #[test]
    fn test_discover_two_levels_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("content");
        write(&root, "top.md", "ignored");
        write(&root, "b-item/post.md", "");
        write(&root, "a-item/index.md", "");
        write(&root, "a-item/photo.png", "");
        write(&root, "deep/nested/post.md", "");

        let ctx = ctx(&root);
        let items = ContentLoader::new(&ctx).discover().unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a-item", "b-item"]);
        assert_eq!(items[0].path, root.join("a-item/index.md"));
    }

    #[test]
    fn test_load_pages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("content");
        write(&root, "one/post.md", "+++\ndate = \"2024-01-01\"\ncategory = \"blog\"\n+++\nOne\n");
        write(&root, "two/post.md", "+++\ndate = \"2024-01-02\"\n+++\nTwo\n");

        let ctx = ctx(&root);
        let mut pages = ContentLoader::new(&ctx).load_pages().unwrap();
        pages.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].category, "blog");
        assert_eq!(pages[1].category, "Uncategorized");
    }

    #[test]
    fn test_malformed_item_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("content");
        write(&root, "good/post.md", "+++\ndate = \"2024-01-01\"\n+++\n");
        write(&root, "bad/post.md", "just text\n");

        let ctx = ctx(&root);
        let err = ContentLoader::new(&ctx).load_pages().unwrap_err();
        assert!(matches!(err, Error::MalformedContent { .. }));
    }

    #[test]
    fn test_missing_content_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(&dir.path().join("nope"));
        let err = ContentLoader::new(&ctx).discover().unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
