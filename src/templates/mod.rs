//! Built-in theme templates using the Tera template engine
//!
//! Templates and the browser assets are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::catalog::{NavigationSelection, PageWindow, Series, SeriesNeighbours};
use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::url_for;

/// Stylesheet written to `/assets/main.css`
pub const MAIN_CSS: &str = include_str!("assets/main.css");

/// Script written to `/assets/main.js`
pub const MAIN_JS: &str = include_str!("assets/main.js");

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Post content and pre-rendered head tags are passed through `safe`
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("devlog/layout.html")),
            ("index.html", include_str!("devlog/index.html")),
            ("post.html", include_str!("devlog/post.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("devlog/partials/header.html"),
            ),
            ("partials/nav.html", include_str!("devlog/partials/nav.html")),
            (
                "partials/drawer.html",
                include_str!("devlog/partials/drawer.html"),
            ),
            (
                "partials/footer.html",
                include_str!("devlog/partials/footer.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("devlog/partials/post_card.html"),
            ),
            (
                "partials/carousel.html",
                include_str!("devlog/partials/carousel.html"),
            ),
            (
                "partials/series_row.html",
                include_str!("devlog/partials/series_row.html"),
            ),
            (
                "partials/pagination.html",
                include_str!("devlog/partials/pagination.html"),
            ),
        ])?;

        // Register custom filters
        let url_config = config.clone();
        tera.register_filter(
            "url_for",
            move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let path = tera::try_get_value!("url_for", "value", String, value);
                Ok(tera::Value::String(url_for(&url_config, &path)))
            },
        );
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };

    Ok(tera::Value::String(crate::helpers::truncate(
        &s,
        length,
        Some("…"),
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }
}

/// A post as shown in listings and the carousel
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub summary: String,
    pub category: String,
    pub date: String,
    pub display_date: String,
    pub path: String,
    pub thumbnail: Option<String>,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            summary: post.summary.clone(),
            category: post.category.clone(),
            date: post.date.to_rfc3339(),
            display_date: post.display_date(),
            path: post.slug.clone(),
            thumbnail: post.thumbnail.clone(),
        }
    }
}

/// Full post page data
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub category: String,
    pub category_href: String,
    pub date: String,
    pub display_date: String,
    pub thumbnail: Option<String>,
    pub content: String,
}

impl PostView {
    pub fn new(post: &Post, config: &SiteConfig) -> Self {
        Self {
            title: post.title.clone(),
            category: post.category.clone(),
            category_href: NavigationSelection::for_category(&post.category, &config.sections)
                .listing_path(1),
            date: post.date.to_rfc3339(),
            display_date: post.display_date(),
            thumbnail: post.thumbnail.clone(),
            content: post.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Pagination control for one listing page
#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub first: Option<PageLink>,
    pub leading_ellipsis: bool,
    pub pages: Vec<PageLink>,
    pub trailing_ellipsis: bool,
    pub last: Option<PageLink>,
}

impl PaginationData {
    pub fn new(window: &PageWindow, selection: &NavigationSelection) -> Self {
        let link = |number: usize| PageLink {
            number,
            href: selection.listing_path(number),
            current: number == window.current,
        };

        Self {
            current: window.current,
            total: window.total,
            prev_href: window
                .has_prev
                .then(|| selection.listing_path(window.current - 1)),
            next_href: window
                .has_next
                .then(|| selection.listing_path(window.current + 1)),
            first: window.show_first.then(|| link(1)),
            leading_ellipsis: window.leading_ellipsis,
            pages: window.pages().map(link).collect(),
            trailing_ellipsis: window.trailing_ellipsis,
            last: window.show_last.then(|| link(window.total)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CarouselData {
    pub interval_ms: u64,
    pub slides: Vec<PostCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: Option<String>,
    pub post_count: usize,
    pub path: String,
    pub active: bool,
}

impl SeriesCard {
    pub fn new(series: &Series, selected: Option<&str>) -> Self {
        Self {
            id: series.id.clone(),
            title: series.title.clone(),
            description: series.description.clone(),
            color: series.color.clone(),
            post_count: series.post_count,
            path: NavigationSelection::for_series(&series.id).listing_path(1),
            active: selected == Some(series.id.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesLink {
    pub title: String,
    pub path: String,
    pub current: bool,
}

/// Series box and prev/next links on a post page
#[derive(Debug, Clone, Serialize)]
pub struct SeriesNav {
    pub title: String,
    pub path: String,
    pub position: usize,
    pub total: usize,
    pub prev: Option<SeriesLink>,
    pub next: Option<SeriesLink>,
    pub posts: Vec<SeriesLink>,
}

impl SeriesNav {
    pub fn new(neighbours: &SeriesNeighbours<'_>, current: &Post, config: &SiteConfig) -> Self {
        let link = |post: &Post| SeriesLink {
            title: post.title.clone(),
            path: post.slug.clone(),
            current: post.id == current.id,
        };

        Self {
            title: config
                .series
                .get(&neighbours.series)
                .map(|m| m.title.clone())
                .unwrap_or_else(|| neighbours.series.clone()),
            path: NavigationSelection::for_series(&neighbours.series).listing_path(1),
            position: neighbours.position,
            total: neighbours.total,
            prev: neighbours.prev.map(link),
            next: neighbours.next.map(link),
            posts: neighbours.posts.iter().copied().map(link).collect(),
        }
    }
}
