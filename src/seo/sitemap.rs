//! Sitemap generation.

use tracing::debug;

use crate::config::SiteConfig;
use crate::content::html_escape;
use crate::helpers::full_url_for;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// Site-relative path.
    pub path: String,

    /// Last modification date (`YYYY-MM-DD`).
    pub lastmod: Option<String>,

    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

impl SitemapUrl {
    pub fn home() -> Self {
        Self {
            path: "/".to_string(),
            lastmod: None,
            changefreq: ChangeFreq::Daily,
            priority: 1.0,
        }
    }

    pub fn listing(path: &str) -> Self {
        Self {
            path: path.to_string(),
            lastmod: None,
            changefreq: ChangeFreq::Weekly,
            priority: 0.6,
        }
    }

    pub fn post(path: &str, lastmod: String) -> Self {
        Self {
            path: path.to_string(),
            lastmod: Some(lastmod),
            changefreq: ChangeFreq::Monthly,
            priority: 0.8,
        }
    }
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator<'a> {
    config: &'a SiteConfig,
}

impl<'a> SitemapGenerator<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Generate sitemap XML from URL entries.
    pub fn generate(&self, urls: &[SitemapUrl]) -> String {
        debug!("Generating sitemap with {} urls", urls.len());

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in urls {
            xml.push_str(&self.url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn url_to_xml(&self, url: &SitemapUrl) -> String {
        let mut xml = String::from("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            html_escape(&full_url_for(self.config, &url.path))
        ));
        if let Some(lastmod) = &url.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            url.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();

        let xml = SitemapGenerator::new(&config).generate(&[
            SitemapUrl::home(),
            SitemapUrl::listing("/section/data-ai/"),
            SitemapUrl::post("/python/gil/", "2025-01-15".to_string()),
        ]);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/section/data-ai/</loc>"));
        assert!(xml.contains("<lastmod>2025-01-15</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
