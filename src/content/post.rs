//! Post model

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Stable identifier (source path relative to the content directory)
    pub id: String,

    /// URL path of the post, always `/…/`
    pub slug: String,

    /// Post title
    pub title: String,

    /// One-line summary shown in listings and meta descriptions
    pub summary: String,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    /// Category name
    pub category: String,

    /// Series id this post belongs to
    pub series: Option<String>,

    /// Position within the series
    pub series_order: Option<u32>,

    /// Thumbnail URL path (site-absolute)
    pub thumbnail: Option<String>,

    /// Rendered HTML content
    pub content: String,

    /// Raw markdown body
    #[serde(skip)]
    pub raw: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: &str, date: DateTime<FixedOffset>, category: &str, slug: &str) -> Self {
        Self {
            id: slug.trim_matches('/').to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            summary: String::new(),
            date,
            category: category.to_string(),
            series: None,
            series_order: None,
            thumbnail: None,
            content: String::new(),
            raw: String::new(),
            full_source: PathBuf::new(),
        }
    }

    /// Builder-style series assignment
    pub fn with_series(mut self, series: &str, order: Option<u32>) -> Self {
        self.series = Some(series.to_string());
        self.series_order = order;
        self
    }

    /// Whether this post belongs to the given series
    pub fn in_series(&self, series: &str) -> bool {
        self.series.as_deref() == Some(series)
    }

    /// Date formatted for display, e.g. `2025.01.15.`
    pub fn display_date(&self) -> String {
        self.date.format("%Y.%m.%d.").to_string()
    }
}

/// Sort posts the way listings expect them: date descending, then title ascending
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
}

/// Build a post for tests without touching the filesystem
#[cfg(test)]
pub(crate) fn test_post(title: &str, date: &str, category: &str) -> Post {
    let day = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let date = day
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_local_timezone(FixedOffset::east_opt(9 * 3600).unwrap())
        .unwrap();
    let slug = format!("/{}/", slug::slugify(title));
    Post::new(title, date, category, &slug)
}
