//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::Sections;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,
    /// Twitter handle used for the twitter:site / twitter:creator cards
    pub twitter: Option<String>,
    /// Search engine verification codes, e.g. `google: <code>`
    pub site_verification: IndexMap<String, String>,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Writing
    pub render_drafts: bool,
    pub default_thumbnail: Option<String>,
    pub external_link: ExternalLinkConfig,
    pub highlight: HighlightConfig,

    // Listing
    pub per_page: usize,
    pub featured_count: usize,
    pub carousel_interval_ms: u64,

    // Taxonomy
    pub sections: Sections,
    pub series: IndexMap<String, SeriesMeta>,

    // SEO
    pub robots: RobotsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "devlog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "ko".to_string(),
            timezone: "Asia/Seoul".to_string(),
            twitter: None,
            site_verification: IndexMap::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "contents".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            render_drafts: false,
            default_thumbnail: None,
            external_link: ExternalLinkConfig::default(),
            highlight: HighlightConfig::default(),

            per_page: 10,
            featured_count: 5,
            carousel_interval_ms: 5000,

            sections: Sections::default(),
            series: default_series(),

            robots: RobotsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                if !self.timezone.is_empty() {
                    tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                }
                chrono_tz::UTC
            }
        }
    }
}

/// Display metadata for a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl SeriesMeta {
    fn new(title: &str, description: &str, color: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            color: Some(color.to_string()),
        }
    }
}

fn default_series() -> IndexMap<String, SeriesMeta> {
    let mut series = IndexMap::new();
    series.insert(
        "python".to_string(),
        SeriesMeta::new("Python", "GIL, 참조 카운팅, GC, 스레드 동기화", "#3776ab"),
    );
    series.insert(
        "fastapi".to_string(),
        SeriesMeta::new("FastAPI", "구조화, DI, 인증, 배포까지", "#099889"),
    );
    series.insert(
        "ml".to_string(),
        SeriesMeta::new("ML 기초", "ML 개요, 프로젝트 워크플로우", "#ff7f0e"),
    );
    series.insert(
        "llm".to_string(),
        SeriesMeta::new("LLM", "LLM 아키텍처, 추론, 파인튜닝", "#7c3aed"),
    );
    series
}

/// External link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinkConfig {
    pub enable: bool,
    pub target: String,
    pub rel: String,
}

impl Default for ExternalLinkConfig {
    fn default() -> Self {
        Self {
            enable: true,
            target: "_blank".to_string(),
            rel: "nofollow".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// robots.txt policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            allow: vec!["/".to_string()],
            disallow: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.per_page, 10);
        assert_eq!(config.featured_count, 5);
        assert_eq!(config.carousel_interval_ms, 5000);
        assert_eq!(config.sections.len(), 5);
        assert!(config.series.contains_key("llm"));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
url: https://blog.example.com
per_page: 20
sections:
  - id: lang
    name: Languages
    categories: [Rust]
series:
  rust:
    title: Rust Deep Dive
site_verification:
  google: abc123
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.series["rust"].title, "Rust Deep Dive");
        assert_eq!(config.series["rust"].color, None);
        assert_eq!(config.site_verification["google"], "abc123");
        // untouched keys keep their defaults
        assert_eq!(config.source_dir, "contents");
        assert!(config.external_link.enable);
    }

    #[test]
    fn test_timezone_fallback() {
        let mut config = SiteConfig::default();
        assert_eq!(config.tz(), chrono_tz::Asia::Seoul);
        config.timezone = "Mars/Olympus".to_string();
        assert_eq!(config.tz(), chrono_tz::UTC);
    }
}
