//! JSON-LD structured data (schema.org)

use serde_json::{json, Value};

use crate::catalog::NavigationSelection;
use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{date_xml, full_url_for};

fn person(name: &str) -> Value {
    json!({ "@type": "Person", "name": name })
}

/// `WebSite` schema emitted on every page
pub fn website_schema(config: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.title,
        "description": config.description,
        "url": full_url_for(config, "/"),
        "inLanguage": config.language,
        "author": person(&config.author),
        "publisher": person(&config.author),
    })
}

/// `Article` schema for a post page
pub fn article_schema(config: &SiteConfig, post: &Post, image: Option<&str>) -> Value {
    let url = full_url_for(config, &post.slug);
    let published = date_xml(&post.date);

    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "description": post.summary,
        "image": image.unwrap_or_default(),
        "url": url,
        "datePublished": published,
        "dateModified": published,
        "author": person(&config.author),
        "publisher": person(&config.author),
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "articleSection": post.category,
    })
}

/// `BreadcrumbList`: Home, then the category listing, then the post
pub fn breadcrumb_schema(config: &SiteConfig, post: &Post) -> Value {
    let category_path =
        NavigationSelection::for_category(&post.category, &config.sections).listing_path(1);

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            {
                "@type": "ListItem",
                "position": 1,
                "name": "Home",
                "item": full_url_for(config, "/"),
            },
            {
                "@type": "ListItem",
                "position": 2,
                "name": post.category,
                "item": full_url_for(config, &category_path),
            },
            {
                "@type": "ListItem",
                "position": 3,
                "name": post.title,
                "item": full_url_for(config, &post.slug),
            },
        ],
    })
}

/// Render schemas as `<script type="application/ld+json">` blocks
pub fn render_json_ld(schemas: &[Value]) -> String {
    schemas
        .iter()
        .map(|schema| {
            // `</script>` inside a string value must not close the tag
            let body = schema.to_string().replace("</", "<\\/");
            format!(r#"<script type="application/ld+json">{}</script>"#, body)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
