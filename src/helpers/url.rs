//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/assets/main.css") // -> "/blog/assets/main.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/python/gil/") // -> "https://example.com/blog/python/gil/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }

    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Full URL of a page with any query string or fragment removed
pub fn canonical_url(config: &SiteConfig, path: &str) -> String {
    let path = path
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    full_url_for(config, path)
}

/// Whether `path` already carries a scheme
pub fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/assets/main.css"), "/blog/assets/main.css");
        assert_eq!(url_for(&config, "about/"), "/blog/about/");
        assert_eq!(url_for(&config, "/"), "/blog/");
        assert_eq!(
            url_for(&config, "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/python/gil/"),
            "https://example.com/blog/python/gil/"
        );

        let mut config = config;
        config.url = "https://example.com/".to_string();
        config.root = "/".to_string();
        assert_eq!(full_url_for(&config, "/a/"), "https://example.com/a/");
    }

    #[test]
    fn test_canonical_url_strips_query() {
        let config = test_config();
        assert_eq!(
            canonical_url(&config, "/?category=LLM#top"),
            "https://example.com/blog/"
        );
    }
}
