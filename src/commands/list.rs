//! List site content without publishing it

use crate::error::Result;
use crate::site::Site;
use crate::Press;

/// What to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListKind {
    Pages,
    Categories,
    Tags,
}

/// Build the site and print a listing to stdout
pub fn run(press: &Press, kind: ListKind) -> Result<()> {
    let site = press.build()?;
    print!("{}", render(&site, kind));
    Ok(())
}

/// Format a listing of `site`
pub fn render(site: &Site, kind: ListKind) -> String {
    match kind {
        ListKind::Pages => {
            let lines = site.pages().iter().map(|page| {
                format!(
                    "{} - {} [{}]",
                    page.published_at.format("%Y-%m-%d"),
                    page.display_title(),
                    page.relative_href()
                )
            });
            listing("Pages", lines.collect())
        }
        ListKind::Categories => {
            let lines = site.categories().iter().map(|c| group_line(&c.name, c.pages.len()));
            listing("Categories", lines.collect())
        }
        ListKind::Tags => {
            let lines = site.tags().iter().map(|t| group_line(&t.name, t.pages.len()));
            listing("Tags", lines.collect())
        }
    }
}

fn group_line(name: &str, pages: usize) -> String {
    format!("{} ({})", name, pages)
}

/// A heading with the entry count, then one indented line per entry
fn listing(heading: &str, lines: Vec<String>) -> String {
    let mut out = format!("{} ({}):\n", heading, lines.len());
    for line in lines {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
