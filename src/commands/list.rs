//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::catalog::{category_counts, collect_series};
use crate::content::loader::ContentLoader;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(blog);
    let config = &blog.config;

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.display_date(),
                    post.title,
                    post.category
                );
            }
        }
        "category" | "categories" => {
            let counts = category_counts(&loader.load_posts()?);
            println!("Categories ({}):", counts.len());
            let mut categories: Vec<_> = counts.into_iter().collect();
            categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (category, count) in categories {
                println!("  {} ({})", category, count);
            }
        }
        "section" | "sections" => {
            let counts: HashMap<String, usize> = category_counts(&loader.load_posts()?);
            println!("Sections ({}):", config.sections.len());
            for section in &config.sections {
                let total: usize = section
                    .categories
                    .iter()
                    .map(|c| counts.get(c).copied().unwrap_or(0))
                    .sum();
                println!("  {} [{}] ({})", section.name, section.id, total);
                for category in &section.categories {
                    println!(
                        "    {} ({})",
                        category,
                        counts.get(category).copied().unwrap_or(0)
                    );
                }
            }
        }
        "series" => {
            let series = collect_series(&loader.load_posts()?, &config.series);
            println!("Series ({}):", series.len());
            for s in series {
                println!("  {} [{}] ({})", s.title, s.id, s.post_count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, categories, sections, series",
                content_type
            );
        }
    }

    Ok(())
}
