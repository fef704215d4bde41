//! Search engine metadata: head tags, JSON-LD, sitemap and robots.txt

mod meta;
mod robots;
mod sitemap;
mod structured_data;

pub use meta::{render_head_meta, PageKind, PageMeta};
pub use robots::render_robots;
pub use sitemap::{ChangeFreq, SitemapGenerator, SitemapUrl};
pub use structured_data::{
    article_schema, breadcrumb_schema, render_json_ld, website_schema,
};
