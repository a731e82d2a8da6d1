//! How Markdown images end up in the rendered HTML

use std::fs;
use std::path::Path;

use super::markdown::html_escape;

/// Rendering strategy for `![alt](link)`, picked from the link's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEmbed {
    /// SVG markup pasted straight into the page
    InlineVector,
    /// A plain `<img>` pointing at the link
    RasterReference,
}

impl ImageEmbed {
    pub fn for_link(link: &str) -> Self {
        let path = link.split(['?', '#']).next().unwrap_or(link);
        if path.to_ascii_lowercase().ends_with(".svg") {
            ImageEmbed::InlineVector
        } else {
            ImageEmbed::RasterReference
        }
    }

    /// Render the image. SVG links resolve against `base_dir`, the content item's directory;
    /// one that cannot be read degrades to an `<img>` tag.
    pub fn render(self, link: &str, alt: &str, base_dir: &Path) -> String {
        match self {
            ImageEmbed::InlineVector => {
                let path = base_dir.join(link);
                match fs::read_to_string(&path) {
                    Ok(svg) => svg,
                    Err(e) => {
                        tracing::warn!("Cannot inline SVG {:?}, linking it instead: {}", path, e);
                        raster_tag(link, alt)
                    }
                }
            }
            ImageEmbed::RasterReference => raster_tag(link, alt),
        }
    }
}

fn raster_tag(link: &str, alt: &str) -> String {
    format!(
        "<img src='{}' alt='{}'>",
        html_escape(link),
        html_escape(alt)
    )
}
