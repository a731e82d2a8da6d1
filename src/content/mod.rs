//! Content module - front-matter, pages, discovery and Markdown rendering

mod frontmatter;
mod image;
pub mod loader;
mod markdown;
mod page;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError, DELIMITER};
pub use image::ImageEmbed;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use page::{
    category_dir, category_href, encode_segment, tag_dir, tag_href, BuildContext, OutputLocation,
    Page, CATEGORY_DIR, INDEX_FILE, TAG_DIR,
};
