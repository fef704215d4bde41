//! HTML helper functions

use super::url::url_for;
use crate::config::SiteConfig;
use crate::content::html_escape;

/// Stylesheet link for a file under `/assets/`
pub fn css(config: &SiteConfig, name: &str) -> String {
    format!(
        r#"<link rel="stylesheet" href="{}">"#,
        url_for(config, &format!("assets/{}", name))
    )
}

/// Deferred script tag for a file under `/assets/`
pub fn js(config: &SiteConfig, name: &str) -> String {
    format!(
        r#"<script src="{}" defer></script>"#,
        url_for(config, &format!("assets/{}", name))
    )
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="devlog {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// `<meta name=… content=…>` with an escaped value
pub fn meta_name(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        html_escape(name),
        html_escape(content)
    )
}

/// `<meta property=… content=…>` with an escaped value
pub fn meta_property(property: &str, content: &str) -> String {
    format!(
        r#"<meta property="{}" content="{}">"#,
        html_escape(property),
        html_escape(content)
    )
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_tags() {
        let config = SiteConfig::default();
        assert_eq!(css(&config, "main.css"), r#"<link rel="stylesheet" href="/assets/main.css">"#);
        assert!(js(&config, "main.js").contains(r#"src="/assets/main.js""#));
    }

    #[test]
    fn test_meta_escapes() {
        assert_eq!(
            meta_property("og:title", "A \"quoted\" <title>"),
            r#"<meta property="og:title" content="A &quot;quoted&quot; &lt;title&gt;">"#
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
    }
}
