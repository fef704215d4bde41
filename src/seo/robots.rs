//! Robots.txt generation.

use crate::config::SiteConfig;
use crate::helpers::full_url_for;

/// Render robots.txt with the configured rules and the sitemap location
pub fn render_robots(config: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\n");

    for path in &config.robots.disallow {
        out.push_str(&format!("Disallow: {}\n", path));
    }
    for path in &config.robots.allow {
        out.push_str(&format!("Allow: {}\n", path));
    }

    out.push_str(&format!(
        "\nSitemap: {}\n",
        full_url_for(config, "/sitemap.xml")
    ));
    out
}
