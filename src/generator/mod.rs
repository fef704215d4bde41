//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{Context as _, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use tera::Context;
use walkdir::WalkDir;

use crate::catalog::{
    build_menu, category_counts, collect_series, filter_posts, page_window, paginate,
    series_neighbours, total_pages, NavMenu, NavigationSelection, Sections, Series,
};
use crate::content::loader::asset_files;
use crate::content::Post;
use crate::helpers::{canonical_url, css, date_only, full_url_for, js, meta_generator};
use crate::seo::{
    article_schema, breadcrumb_schema, render_head_meta, render_json_ld, render_robots,
    website_schema, PageKind, PageMeta, SitemapGenerator, SitemapUrl,
};
use crate::templates::{
    CarouselData, ConfigData, PaginationData, PostCard, PostView, SeriesCard, SeriesNav,
    TemplateRenderer, MAIN_CSS, MAIN_JS,
};
use crate::ui::{theme::init_script, Carousel};
use crate::Blog;

/// What a build produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub posts: usize,
    pub listing_pages: usize,
    /// Posts left out because their URL was already taken
    pub skipped_posts: usize,
}

/// Taxonomy shared by every page of one build
struct SiteData {
    counts: HashMap<String, usize>,
    series: Vec<Series>,
}

/// Static site generator using Tera templates
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        Ok(Self { blog, renderer })
    }

    /// Generate the entire site from posts sorted for listing
    pub fn generate(&self, posts: &[Post]) -> Result<GenerateSummary> {
        let config = &self.blog.config;

        // Ensure public directory exists
        fs::create_dir_all(&self.blog.public_dir)?;

        self.write_assets()?;
        self.copy_static_files()?;
        self.copy_source_assets()?;

        let reserved = self.listing_paths(posts)?;
        let published = publishable_posts(posts, &reserved);
        let skipped_posts = posts.len() - published.len();
        let posts = published.as_slice();

        let site = SiteData {
            counts: category_counts(posts),
            series: collect_series(posts, &config.series),
        };

        let mut sitemap = vec![SitemapUrl::home()];
        let mut summary = GenerateSummary {
            skipped_posts,
            ..GenerateSummary::default()
        };

        for selection in listing_selections(posts, &config.sections, &site.series)? {
            let paths = self.generate_listing(&selection, posts, &site)?;
            summary.listing_pages += paths.len();
            sitemap.extend(
                paths
                    .iter()
                    .filter(|p| p.as_str() != "/")
                    .map(|p| SitemapUrl::listing(p)),
            );
        }

        for post in posts {
            self.generate_post(post, posts, &site)?;
            sitemap.push(SitemapUrl::post(&post.slug, date_only(&post.date)));
            summary.posts += 1;
        }

        self.write_file("sitemap.xml", &SitemapGenerator::new(config).generate(&sitemap))?;
        self.write_file("robots.txt", &render_robots(config))?;

        tracing::info!(
            "Generated {} posts and {} listing pages",
            summary.posts,
            summary.listing_pages
        );
        if summary.skipped_posts > 0 {
            tracing::warn!(
                "{} posts were not written because their URL was taken",
                summary.skipped_posts
            );
        }

        Ok(summary)
    }

    /// Create a base context with common variables
    fn create_base_context(&self, menu: &NavMenu, meta: &PageMeta, schemas: &[Value]) -> Context {
        let config = &self.blog.config;
        let year = chrono::Utc::now()
            .with_timezone(&config.tz())
            .format("%Y")
            .to_string();

        let mut context = Context::new();
        context.insert("config", &ConfigData::from(config));
        context.insert("menu", menu);
        context.insert("page_title", &meta.title);
        context.insert("head_meta", &render_head_meta(config, meta));
        context.insert("json_ld", &render_json_ld(schemas));
        context.insert("theme_init", &init_script());
        context.insert("generator", &meta_generator());
        context.insert("stylesheet", &css(config, "main.css"));
        context.insert("script", &js(config, "main.js"));
        context.insert("year", &year);
        context
    }

    /// Generate every page of one listing. Returns the written URL paths.
    fn generate_listing(
        &self,
        selection: &NavigationSelection,
        posts: &[Post],
        site: &SiteData,
    ) -> Result<Vec<String>> {
        let config = &self.blog.config;
        let per_page = config.per_page.max(1);

        let filtered = filter_posts(posts, selection, &config.sections);
        let pages = total_pages(filtered.len(), per_page).max(1);
        let menu = build_menu(selection, &config.sections, &site.counts);
        let title = self.listing_title(selection);

        let mut paths = Vec::with_capacity(pages);

        for page_num in 1..=pages {
            let page = paginate(&filtered, page_num, per_page);
            let cards: Vec<PostCard> = page.items.iter().map(|p| PostCard::from(*p)).collect();
            let pagination = page_window(page_num, page.total_pages)
                .map(|window| PaginationData::new(&window, selection));

            let path = selection.listing_path(page_num);
            let is_home = selection.is_all() && page_num == 1;

            let carousel = if is_home {
                self.carousel_data(posts)
            } else {
                None
            };

            let series_list: Vec<SeriesCard> =
                if page_num == 1 && !selection.has_section() && !selection.has_category() {
                    site.series
                        .iter()
                        .map(|s| SeriesCard::new(s, selection.series.as_deref()))
                        .collect()
                } else {
                    Vec::new()
                };

            let page_title = if selection.is_all() {
                config.title.clone()
            } else {
                format!("{} | {}", title, config.title)
            };

            let meta = PageMeta {
                kind: PageKind::Website,
                title: page_title,
                description: config.description.clone(),
                url: canonical_url(config, &path),
                image: self.default_image(),
            };

            let mut context = self.create_base_context(&menu, &meta, &[website_schema(config)]);
            context.insert("selection", selection);
            context.insert("listing_title", &title);
            context.insert("listing_count", &filtered.len());
            context.insert("posts", &cards);
            context.insert("pagination", &pagination);
            context.insert("carousel", &carousel);
            context.insert("series_list", &series_list);

            let html = self.renderer.render("index.html", &context)?;
            self.write_page(&path, &html)?;
            paths.push(path);
        }

        Ok(paths)
    }

    /// Generate an individual post page
    fn generate_post(&self, post: &Post, posts: &[Post], site: &SiteData) -> Result<()> {
        let config = &self.blog.config;

        let selection = NavigationSelection::for_category(&post.category, &config.sections);
        let menu = build_menu(&selection, &config.sections, &site.counts);

        let image = post
            .thumbnail
            .as_deref()
            .map(|t| full_url_for(config, t))
            .or_else(|| self.default_image());

        let meta = PageMeta {
            kind: PageKind::Article,
            title: format!("{} | {}", post.title, config.title),
            description: post.summary.clone(),
            url: canonical_url(config, &post.slug),
            image: image.clone(),
        };
        let schemas = [
            website_schema(config),
            article_schema(config, post, image.as_deref()),
            breadcrumb_schema(config, post),
        ];

        let series_nav =
            series_neighbours(posts, post).map(|n| SeriesNav::new(&n, post, config));

        let mut context = self.create_base_context(&menu, &meta, &schemas);
        context.insert("post", &PostView::new(post, config));
        context.insert("series_nav", &series_nav);

        let html = self.renderer.render("post.html", &context)?;
        self.write_page(&post.slug, &html)?;
        Ok(())
    }

    /// Every listing URL a build over `posts` writes, pagination included
    fn listing_paths(&self, posts: &[Post]) -> Result<HashSet<String>> {
        let config = &self.blog.config;
        let per_page = config.per_page.max(1);
        let series = collect_series(posts, &config.series);

        let mut paths = HashSet::new();
        for selection in listing_selections(posts, &config.sections, &series)? {
            let count = filter_posts(posts, &selection, &config.sections).len();
            for page in 1..=total_pages(count, per_page).max(1) {
                paths.insert(selection.listing_path(page));
            }
        }
        Ok(paths)
    }

    /// Featured slides for the home page
    fn carousel_data(&self, posts: &[Post]) -> Option<CarouselData> {
        let config = &self.blog.config;
        let carousel = Carousel::new(
            config.featured_count.min(posts.len()),
            Duration::from_millis(config.carousel_interval_ms),
        );
        if carousel.count() == 0 {
            return None;
        }

        Some(CarouselData {
            interval_ms: config.carousel_interval_ms,
            slides: posts[..carousel.count()].iter().map(PostCard::from).collect(),
        })
    }

    fn listing_title(&self, selection: &NavigationSelection) -> String {
        let config = &self.blog.config;
        let mut parts = Vec::new();

        if selection.has_category() {
            parts.push(selection.category.clone());
        } else if selection.has_section() {
            parts.push(
                config
                    .sections
                    .get(&selection.section)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| selection.section.clone()),
            );
        }
        if let Some(id) = &selection.series {
            parts.push(
                config
                    .series
                    .get(id)
                    .map(|m| m.title.clone())
                    .unwrap_or_else(|| id.clone()),
            );
        }

        if parts.is_empty() {
            "All Posts".to_string()
        } else {
            parts.join(" · ")
        }
    }

    fn default_image(&self) -> Option<String> {
        let config = &self.blog.config;
        config
            .default_thumbnail
            .as_deref()
            .map(|t| full_url_for(config, t))
    }

    /// Write `<url_path>/index.html`
    fn write_page(&self, url_path: &str, html: &str) -> Result<()> {
        let output_path = self
            .blog
            .public_dir
            .join(url_path.trim_matches('/'))
            .join("index.html");
        write_with_parents(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        write_with_parents(&output_path, content)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Embedded stylesheet and script
    fn write_assets(&self) -> Result<()> {
        self.write_file("assets/main.css", MAIN_CSS)?;
        self.write_file("assets/main.js", MAIN_JS)
    }

    /// Copy the static directory verbatim
    fn copy_static_files(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                copy_with_parents(path, &self.blog.public_dir.join(relative))?;
            }
        }

        Ok(())
    }

    /// Copy source assets (thumbnails, images, etc.) next to their posts
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for path in asset_files(source_dir) {
            let relative = path.strip_prefix(source_dir)?;
            copy_with_parents(&path, &self.blog.public_dir.join(relative))?;
        }

        Ok(())
    }
}

/// Every listing selection worth pre-rendering.
///
/// All posts, each section, each populated category, then the same
/// selections restricted to each series when that intersection is non-empty.
/// Fails when two different selections would share a listing path.
pub fn listing_selections(
    posts: &[Post],
    sections: &Sections,
    series: &[Series],
) -> Result<Vec<NavigationSelection>> {
    let counts = category_counts(posts);

    let mut base = vec![NavigationSelection::all()];
    for section in sections {
        base.push(NavigationSelection::for_section(&section.id));
        for category in &section.categories {
            if counts.get(category).copied().unwrap_or(0) > 0 {
                base.push(NavigationSelection::for_category(category, sections));
            }
        }
    }

    let mut orphans: Vec<&String> = counts
        .keys()
        .filter(|c| sections.section_for_category(c) == crate::catalog::ALL_SECTIONS)
        .collect();
    orphans.sort();
    for category in orphans {
        base.push(NavigationSelection::for_category(category, sections));
    }

    let mut candidates = base.clone();
    for s in series {
        for selection in &base {
            let restricted = selection.clone().with_series(Some(&s.id));
            if !filter_posts(posts, &restricted, sections).is_empty() {
                candidates.push(restricted);
            }
        }
    }

    let mut by_path: HashMap<String, NavigationSelection> = HashMap::new();
    let mut selections = Vec::with_capacity(candidates.len());
    for selection in candidates {
        let path = selection.listing_path(1);
        match by_path.get(&path) {
            // A category listed under two sections
            Some(existing) if *existing == selection => continue,
            Some(existing) => anyhow::bail!(
                "Listings {:?} and {:?} would both be written to {}; rename one of them",
                existing.to_query_string(),
                selection.to_query_string(),
                path
            ),
            None => {
                by_path.insert(path, selection.clone());
                selections.push(selection);
            }
        }
    }

    Ok(selections)
}

/// Posts whose URL is free, newest first.
///
/// A post is left out, with a warning, when its slug is a listing path
/// (`contents/index.md` would replace the home page) or when a newer post
/// already has the same slug.
pub fn publishable_posts(posts: &[Post], listing_paths: &HashSet<String>) -> Vec<Post> {
    let mut taken: HashMap<&str, &Post> = HashMap::new();
    let mut published = Vec::with_capacity(posts.len());

    for post in posts {
        if listing_paths.contains(&post.slug) {
            tracing::warn!(
                "Skipping {:?}: its URL {} is a listing page",
                post.id,
                post.slug
            );
            continue;
        }
        if let Some(first) = taken.get(post.slug.as_str()) {
            tracing::warn!(
                "Skipping {:?}: its URL {} is already used by {:?}",
                post.id,
                post.slug,
                first.id
            );
            continue;
        }
        taken.insert(&post.slug, post);
        published.push(post.clone());
    }

    published
}

fn write_with_parents(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

fn copy_with_parents(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    Ok(())
}
