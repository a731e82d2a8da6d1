//! Site assembly - the master page list plus category and tag indices
//!
//! A [`Site`] is built once from every content item and is read-only afterwards,
//! so publishing can fan out across threads.

mod index;

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub use index::{CategoryIndex, TagIndex};

use crate::content::{BuildContext, ContentLoader, Page};
use crate::error::{Error, Result};

/// Something that renders and writes each part of a [`Site`]
pub trait Publish: Sync {
    fn publish_category(&self, category: &CategoryIndex, categories: &[String]) -> Result<()>;

    fn publish_tag(&self, tag: &TagIndex, categories: &[String]) -> Result<()>;

    fn publish_page(&self, page: &Page, categories: &[String]) -> Result<()>;

    /// Called once, after everything else has been published
    fn publish_home(&self, pages: &[Arc<Page>], categories: &[String]) -> Result<()>;
}

/// The whole site, ready to publish
#[derive(Debug, Clone)]
pub struct Site {
    pages: Vec<Arc<Page>>,
    categories: Vec<CategoryIndex>,
    tags: Vec<TagIndex>,
}

impl Site {
    /// Discover and parse all content under `ctx.content_root`
    pub fn load(ctx: &BuildContext) -> Result<Self> {
        let pages = ContentLoader::new(ctx).load_pages()?;
        tracing::info!("Loaded {} pages", pages.len());
        Self::from_pages(pages)
    }

    /// Assemble the indices from already-parsed pages
    pub fn from_pages(pages: Vec<Page>) -> Result<Self> {
        check_unique_outputs(&pages)?;

        let pages = index::sorted(pages.into_iter().map(Arc::new).collect());
        let categories = index::group_by_category(&pages);
        let tags = index::group_by_tag(&pages);

        tracing::debug!(
            "Built {} categories and {} tags",
            categories.len(),
            tags.len()
        );

        Ok(Self {
            pages,
            categories,
            tags,
        })
    }

    /// Every page, newest first
    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    /// Category indices ordered by name
    pub fn categories(&self) -> &[CategoryIndex] {
        &self.categories
    }

    /// Tag indices ordered by name
    pub fn tags(&self) -> &[TagIndex] {
        &self.tags
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryIndex> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn tag(&self, name: &str) -> Option<&TagIndex> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Publish categories, tags and pages in parallel, then the homepage.
    /// Stops at the first error.
    pub fn publish<P: Publish + ?Sized>(&self, publisher: &P) -> Result<()> {
        let names = self.category_names();

        self.categories
            .par_iter()
            .try_for_each(|category| publisher.publish_category(category, &names))?;
        tracing::info!("Published {} categories", self.categories.len());

        self.tags
            .par_iter()
            .try_for_each(|tag| publisher.publish_tag(tag, &names))?;
        tracing::info!("Published {} tags", self.tags.len());

        self.pages
            .par_iter()
            .try_for_each(|page| publisher.publish_page(page, &names))?;
        tracing::info!("Published {} pages", self.pages.len());

        publisher.publish_home(&self.pages, &names)?;
        tracing::info!("Published homepage");

        Ok(())
    }
}

fn check_unique_outputs(pages: &[Page]) -> Result<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for page in pages {
        if let Some(first) = seen.insert(page.output_path(), &page.source) {
            return Err(Error::DuplicateOutput {
                output: page.output_path().to_path_buf(),
                first: first.to_path_buf(),
                second: page.source.clone(),
            });
        }
    }
    Ok(())
}
