//! Generate the static site

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::publish;
use crate::Press;

/// What a generate run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub categories: usize,
    pub tags: usize,
    pub static_files: usize,
    pub elapsed: Duration,
}

/// Build the site, publish it, then copy static files
pub fn run(press: &Press) -> Result<Summary> {
    run_with_options(press, false)
}

/// Generate, optionally deleting the previous output once the content has parsed
pub fn run_with_options(press: &Press, clean: bool) -> Result<Summary> {
    let start = Instant::now();

    // a malformed item fails here, before anything is deleted or written
    let site = press.build()?;
    tracing::info!(
        "Built {} pages in {} categories with {} tags",
        site.pages().len(),
        site.categories().len(),
        site.tags().len()
    );

    if clean {
        press.clean()?;
    }
    press.publish(&site)?;

    let static_files = match &press.static_dir {
        Some(dir) => publish::copy_static(dir, &press.publish_dir)?,
        None => {
            tracing::debug!("No static directory, skipping copy");
            0
        }
    };

    let elapsed = start.elapsed();
    tracing::info!("Generated in {:.2}s", elapsed.as_secs_f64());

    Ok(Summary {
        pages: site.pages().len(),
        categories: site.categories().len(),
        tags: site.tags().len(),
        static_files,
        elapsed,
    })
}
