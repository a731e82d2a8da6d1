//! Category and tag groupings

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::content::{category_dir, tag_dir, Page, INDEX_FILE};

/// Pages sharing a category, newest first
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    pub name: String,
    pub pages: Vec<Arc<Page>>,
}

impl CategoryIndex {
    /// `<root>/categories/<name>/index.html`
    pub fn output_path(&self, publish_root: &Path) -> PathBuf {
        category_dir(publish_root, &self.name).join(INDEX_FILE)
    }
}

/// Pages carrying a tag, newest first
#[derive(Debug, Clone)]
pub struct TagIndex {
    pub name: String,
    pub pages: Vec<Arc<Page>>,
}

impl TagIndex {
    /// `<root>/tags/<name>/index.html`
    pub fn output_path(&self, publish_root: &Path) -> PathBuf {
        tag_dir(publish_root, &self.name).join(INDEX_FILE)
    }
}

/// One index per distinct category, ordered by name
pub(crate) fn group_by_category(pages: &[Arc<Page>]) -> Vec<CategoryIndex> {
    let mut groups: BTreeMap<&str, Vec<Arc<Page>>> = BTreeMap::new();
    for page in pages {
        groups
            .entry(page.category.as_str())
            .or_default()
            .push(Arc::clone(page));
    }

    groups
        .into_iter()
        .map(|(name, pages)| CategoryIndex {
            name: name.to_string(),
            pages: sorted(pages),
        })
        .collect()
}

/// One index per distinct tag, ordered by name. A page listing a tag twice appears once.
pub(crate) fn group_by_tag(pages: &[Arc<Page>]) -> Vec<TagIndex> {
    let mut groups: BTreeMap<&str, Vec<Arc<Page>>> = BTreeMap::new();
    for page in pages {
        let mut seen = HashSet::new();
        for tag in &page.tags {
            if seen.insert(tag.as_str()) {
                groups.entry(tag.as_str()).or_default().push(Arc::clone(page));
            }
        }
    }

    groups
        .into_iter()
        .map(|(name, pages)| TagIndex {
            name: name.to_string(),
            pages: sorted(pages),
        })
        .collect()
}

/// The one place page order is decided
pub(crate) fn sorted(mut pages: Vec<Arc<Page>>) -> Vec<Arc<Page>> {
    pages.sort_by(|a, b| Page::newest_first(a, b));
    pages
}
