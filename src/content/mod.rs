//! Content module - handles posts and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use markdown::{html_escape, MarkdownRenderer};
pub use post::{sort_posts, Post};

#[cfg(test)]
pub(crate) use post::test_post;
