//! `<head>` metadata for a page

use crate::config::SiteConfig;
use crate::helpers::{meta_name, meta_property};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Website,
    Article,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Website => "website",
            PageKind::Article => "article",
        }
    }
}

/// What a page says about itself to crawlers and link previews
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub kind: PageKind,
    pub title: String,
    pub description: String,
    /// Absolute canonical URL
    pub url: String,
    /// Absolute image URL
    pub image: Option<String>,
}

/// Description, canonical link, Open Graph, Twitter card and verification tags
pub fn render_head_meta(config: &SiteConfig, page: &PageMeta) -> String {
    let mut tags = vec![
        meta_name("description", &page.description),
        format!(r#"<link rel="canonical" href="{}">"#, page.url),
        meta_property("og:type", page.kind.as_str()),
        meta_property("og:title", &page.title),
        meta_property("og:description", &page.description),
        meta_property("og:url", &page.url),
        meta_property("og:site_name", &config.title),
        meta_property("og:locale", &config.language),
        meta_name("twitter:card", "summary_large_image"),
        meta_name("twitter:title", &page.title),
        meta_name("twitter:description", &page.description),
    ];

    if let Some(image) = &page.image {
        tags.push(meta_property("og:image", image));
        tags.push(meta_name("twitter:image", image));
        tags.push(meta_name("twitter:image:alt", &page.title));
    }

    if let Some(handle) = config.twitter.as_deref().filter(|h| !h.is_empty()) {
        let handle = if handle.starts_with('@') {
            handle.to_string()
        } else {
            format!("@{}", handle)
        };
        tags.push(meta_name("twitter:site", &handle));
        tags.push(meta_name("twitter:creator", &handle));
    }

    for (engine, code) in &config.site_verification {
        let name = if engine.ends_with("-site-verification") {
            engine.clone()
        } else {
            format!("{}-site-verification", engine)
        };
        tags.push(meta_name(&name, code));
    }

    tags.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageMeta {
        PageMeta {
            kind: PageKind::Article,
            title: "GIL".to_string(),
            description: "About the GIL".to_string(),
            url: "https://example.com/python/gil/".to_string(),
            image: Some("https://example.com/python/gil/t.png".to_string()),
        }
    }

    #[test]
    fn test_article_meta() {
        let mut config = SiteConfig::default();
        config.twitter = Some("dh5473".to_string());
        config
            .site_verification
            .insert("google".to_string(), "abc".to_string());

        let html = render_head_meta(&config, &page());
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/python/gil/">"#));
        assert!(html.contains(r#"<meta name="twitter:site" content="@dh5473">"#));
        assert!(html.contains(r#"<meta name="google-site-verification" content="abc">"#));
        assert!(html.contains(r#"<meta name="twitter:image""#));
    }

    #[test]
    fn test_no_image_no_twitter() {
        let mut page = page();
        page.image = None;
        let html = render_head_meta(&SiteConfig::default(), &page);
        assert!(!html.contains("og:image"));
        assert!(!html.contains("twitter:site"));
    }
}
