//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::path::Path;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::ImageEmbed;
use crate::config::MarkdownConfig;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    hard_wrap: bool,
    filter_html: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&MarkdownConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &MarkdownConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.highlight_theme.clone(),
            line_numbers: config.line_numbers,
            hard_wrap: config.hard_wrap,
            filter_html: config.filter_html,
        }
    }

    /// Render markdown to HTML. Relative SVG images are resolved against `base_dir`.
    pub fn render(&self, markdown: &str, base_dir: &Path) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut image: Option<(String, String)> = None;

        for event in parser {
            if let Some((lang, content)) = code_block.as_mut() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(content, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    Event::Text(text) => content.push_str(&text),
                    _ => {}
                }
                continue;
            }

            if let Some((link, alt)) = image.as_mut() {
                match event {
                    Event::End(TagEnd::Image) => {
                        let embed = ImageEmbed::for_link(link).render(link, alt, base_dir);
                        events.push(Event::InlineHtml(CowStr::from(embed)));
                        image = None;
                    }
                    Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    image = Some((dest_url.to_string(), String::new()));
                }
                Event::SoftBreak if self.hard_wrap => events.push(Event::HardBreak),
                Event::Html(_) | Event::InlineHtml(_) if self.filter_html => {}
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted =
            theme.and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for HTML content and quoted attributes
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().render(markdown, Path::new("."))
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains("highlight rust"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_indented_code_block_not_leaked_as_text() {
        let html = render("para\n\n    let x = 1;\n");
        assert!(html.contains("highlight text"));
        assert!(!html.contains("<p>let x"));
    }

    #[test]
    fn test_hard_wrap() {
        let html = render("one\ntwo");
        assert!(html.contains("one<br />"));

        let config = MarkdownConfig {
            hard_wrap: false,
            ..MarkdownConfig::default()
        };
        let html = MarkdownRenderer::with_options(&config).render("one\ntwo", Path::new("."));
        assert!(!html.contains("<br"));
    }

    #[test]
    fn test_filter_html() {
        let html = render("before <script>alert(1)</script> after\n\n<div>block</div>\n");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<div>"));

        let config = MarkdownConfig {
            filter_html: false,
            ..MarkdownConfig::default()
        };
        let html = MarkdownRenderer::with_options(&config).render("<div>block</div>\n", Path::new("."));
        assert!(html.contains("<div>block</div>"));
    }

    #[test]
    fn test_images_pass_through_embed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.svg"), "<svg id=\"logo\"></svg>").unwrap();

        let html = MarkdownRenderer::new().render(
            "![Logo](logo.svg)\n\n![A *photo*](photo.png)",
            dir.path(),
        );
        assert!(html.contains("<svg id=\"logo\"></svg>"));
        assert!(html.contains("<img src='photo.png' alt='A photo'>"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_line_numbers() {
        let config = MarkdownConfig {
            line_numbers: true,
            ..MarkdownConfig::default()
        };
        let html = MarkdownRenderer::with_options(&config)
            .render("```python\na = 1\nb = 2\n```", Path::new("."));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }
}
