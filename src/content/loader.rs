//! Content loader - loads posts from the content directory

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::{sort_posts, FrontMatter, MarkdownRenderer, Post};
use crate::helpers::is_absolute_url;
use crate::Blog;

/// Category given to posts whose front-matter has none
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Length of the summary derived from the body when front-matter has none
const SUMMARY_CHARS: usize = 150;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &blog.config.highlight.theme,
            blog.config.external_link.clone(),
        );
        Self { blog, renderer }
    }

    /// Load every post under the source directory, sorted for listing
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            tracing::warn!("Source directory {:?} does not exist", source_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => tracing::debug!("Skipping draft {:?}", path),
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {:#}", path, e);
                }
            }
        }

        sort_posts(&mut posts);

        Ok(posts)
    }

    /// Load a single post from a file. Returns `None` for drafts that should not render.
    fn load_post(&self, path: &Path) -> Result<Option<Post>> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(&content)?;

        if fm.draft && !self.blog.config.render_drafts {
            return Ok(None);
        }

        let relative = path.strip_prefix(&self.blog.source_dir).unwrap_or(path);
        let slug = slug_for(relative);

        let tz = self.blog.config.tz();
        let date = match fm.parse_date(&tz) {
            Some(date) => date,
            None => file_date(path, &tz)?,
        };

        let title = fm.title.clone().unwrap_or_else(|| {
            slug.trim_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or("Untitled")
                .to_string()
        });
        let category = fm
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let content_html = self.renderer.render(body)?;

        let summary = fm
            .summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| derive_summary(&content_html, SUMMARY_CHARS));

        // A post's own thumbnail sits next to it; the default is site-relative
        let thumbnail = match fm.thumbnail.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(t) => Some(resolve_asset_url(relative, t)),
            None => self
                .blog
                .config
                .default_thumbnail
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(site_asset_url),
        };

        let mut post = Post::new(&title, date, &category, &slug);
        post.id = relative.to_string_lossy().replace('\\', "/");
        post.summary = summary;
        post.series = fm.series.clone().filter(|s| !s.trim().is_empty());
        post.series_order = fm.series_order;
        post.thumbnail = thumbnail;
        post.content = content_html;
        post.raw = body.to_string();
        post.full_source = path.to_path_buf();

        Ok(Some(post))
    }
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Derive the URL path of a post from its path relative to the content directory.
///
/// `python/gil/index.md` and `python/gil.md` both become `/python/gil/`.
pub fn slug_for(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let mut parts: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if parts.last().map(|p| p == "index").unwrap_or(false) {
        parts.pop();
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", parts.join("/"))
    }
}

/// Resolve an asset referenced from a post into a site-absolute URL path
pub fn resolve_asset_url(post_relative: &Path, asset: &str) -> String {
    if asset.starts_with("http://") || asset.starts_with("https://") || asset.starts_with('/') {
        return asset.to_string();
    }

    let base = post_relative.parent().unwrap_or(Path::new(""));
    let mut parts: Vec<String> = Vec::new();
    for component in base.join(asset).components() {
        match component {
            Component::Normal(s) => parts.push(s.to_string_lossy().to_string()),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }

    format!("/{}", parts.join("/"))
}

/// Resolve a site-relative asset into a site-absolute URL path
pub fn site_asset_url(asset: &str) -> String {
    if is_absolute_url(asset) || asset.starts_with('/') {
        asset.to_string()
    } else {
        format!("/{}", asset.trim_start_matches("./"))
    }
}

/// First `max_chars` characters of the text content of rendered HTML
fn derive_summary(html: &str, max_chars: usize) -> String {
    let text = crate::helpers::strip_html(html);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        text
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}…", truncated.trim_end())
    }
}

/// Fall back to the file modification time
fn file_date(path: &Path, tz: &chrono_tz::Tz) -> Result<DateTime<FixedOffset>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified).with_timezone(tz).fixed_offset())
}

/// Paths of the non-markdown files in the content directory (post assets)
pub fn asset_files(source_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && !is_markdown_file(p))
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
        })
        .collect()
}
