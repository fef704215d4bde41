//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::config::ExternalLinkConfig;
use crate::ui::clipboard::COPY_LABEL;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    external_link: ExternalLinkConfig,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", ExternalLinkConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, external_link: ExternalLinkConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            external_link,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // YAML metadata blocks stay off, FrontMatter::parse() handles them
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();

        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        // Buffered heading: (level, classes, attrs, inner events)
        let mut heading: Option<(HeadingLevel, Vec<CowStr>, Vec<(CowStr, Option<CowStr>)>, Vec<Event>)> =
            None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang
                            .split_whitespace()
                            .next()
                            .filter(|l| !l.is_empty())
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref())?;
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes,
                    attrs,
                }) => {
                    heading = Some((level, classes, attrs, Vec::new()));
                }
                Event::End(TagEnd::Heading(level)) if heading.is_some() => {
                    if let Some((_, classes, attrs, inner)) = heading.take() {
                        let text: String = inner
                            .iter()
                            .filter_map(|e| match e {
                                Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
                                _ => None,
                            })
                            .collect();
                        let id = slug::slugify(&text);
                        events.push(Event::Start(Tag::Heading {
                            level,
                            id: (!id.is_empty()).then(|| CowStr::from(id)),
                            classes,
                            attrs,
                        }));
                        events.extend(inner);
                        events.push(Event::End(TagEnd::Heading(level)));
                    }
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) if self.external_link.enable && is_external(&dest_url) => {
                    let mut tag = format!(
                        r#"<a href="{}" target="{}" rel="{}""#,
                        html_escape(&dest_url),
                        html_escape(&self.external_link.target),
                        html_escape(&self.external_link.rel)
                    );
                    if !title.is_empty() {
                        tag.push_str(&format!(r#" title="{}""#, html_escape(&title)));
                    }
                    tag.push('>');
                    push_event(&mut events, &mut heading, Event::InlineHtml(CowStr::from(tag)));
                }
                other => push_event(&mut events, &mut heading, other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block into `<pre class="language-…">` with a copy button
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));

        let body = match (syntax, self.theme()) {
            (Some(syntax), Some(theme)) => {
                let mut highlighter = HighlightLines::new(syntax, theme);
                let mut body = String::with_capacity(code.len() * 2);
                for line in LinesWithEndings::from(code) {
                    let regions = highlighter.highlight_line(line, &self.syntax_set)?;
                    body.push_str(&styled_line_to_highlighted_html(
                        &regions[..],
                        IncludeBackground::No,
                    )?);
                }
                body
            }
            // Unknown language: plain escaped text
            _ => html_escape(code),
        };

        let lang_class = html_escape(lang);
        Ok(format!(
            r#"<pre class="language-{lang}"><code class="language-{lang}">{body}</code><button class="copy-button" type="button">{label}</button></pre>"#,
            lang = lang_class,
            body = body,
            label = COPY_LABEL
        ))
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Push an event either into the buffered heading or the output stream
fn push_event<'a>(
    events: &mut Vec<Event<'a>>,
    heading: &mut Option<(HeadingLevel, Vec<CowStr<'a>>, Vec<(CowStr<'a>, Option<CowStr<'a>>)>, Vec<Event<'a>>)>,
    event: Event<'a>,
) {
    match heading {
        Some((_, _, _, inner)) => inner.push(event),
        None => events.push(event),
    }
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```python\nprint('hi')\n```").unwrap();
        assert!(html.contains(r#"<pre class="language-python">"#));
        assert!(html.contains(r#"<button class="copy-button" type="button">Copy</button>"#));
        assert!(html.contains("print"));
    }

    #[test]
    fn test_unknown_language_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\n<tag>\n```").unwrap();
        assert!(html.contains(r#"<pre class="language-nosuchlang">"#));
        assert!(html.contains("&lt;tag&gt;"));
    }

    #[test]
    fn test_external_links() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("[ext](https://example.com) and [int](/about/)")
            .unwrap();
        assert!(html.contains(r#"<a href="https://example.com" target="_blank" rel="nofollow">ext</a>"#));
        assert!(html.contains(r#"<a href="/about/">int</a>"#));
    }

    #[test]
    fn test_external_links_disabled() {
        let config = ExternalLinkConfig {
            enable: false,
            ..Default::default()
        };
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", config);
        let html = renderer.render("[ext](https://example.com)").unwrap();
        assert!(!html.contains("target="));
    }

    #[test]
    fn test_heading_with_link_keeps_id() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("## See [docs](https://docs.rs)")
            .unwrap();
        assert!(html.contains(r#"<h2 id="see-docs">"#));
        assert!(html.contains(r#"target="_blank""#));
    }
}
