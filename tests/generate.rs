use std::fs;
use std::path::Path;

use devlog::Blog;

const CONFIG: &str = r#"
title: Test Log
description: Notes on systems
author: Tester
url: https://blog.example.com
timezone: UTC
per_page: 2
featured_count: 3
twitter: tester
site_verification:
  google: abc123
series:
  python:
    title: Python Internals
    description: GIL and friends
    color: '#3776ab'
robots:
  allow: [/]
  disallow: [/drafts/]
"#;

fn write_post(root: &Path, slug: &str, front_matter: &str, body: &str) {
    let dir = root.join("contents").join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.md"), format!("---\n{}\n---\n{}", front_matter, body)).unwrap();
}

fn sample_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("_config.yml"), CONFIG).unwrap();

    write_post(
        root,
        "gil",
        "title: The GIL\ndate: 2025-03-01 10:00:00\ncategory: Python\nseries: python\nseriesOrder: 1\nthumbnail: cover.png",
        "The global interpreter lock.\n\n```python\nprint('hi')\n```\n",
    );
    fs::write(root.join("contents/gil/cover.png"), b"png").unwrap();
    write_post(
        root,
        "refcount",
        "title: Reference Counting\ndate: 2025-02-01\ncategory: Python\nseries: python\nseriesOrder: 2",
        "Counting references.",
    );
    write_post(
        root,
        "attention",
        "title: Attention\ndate: 2025-01-15\ncategory: LLM",
        "Attention is all you need.",
    );
    write_post(
        root,
        "sourdough",
        "title: Sourdough\ndate: 2024-12-01\ncategory: Cooking",
        "Not in any section.",
    );
    write_post(
        root,
        "wip",
        "title: Work in progress\ndate: 2025-04-01\ncategory: Python\ndraft: true",
        "Hidden.",
    );

    fs::create_dir_all(root.join("static")).unwrap();
    fs::write(root.join("static/favicon.ico"), b"ico").unwrap();

    dir
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join("public").join(relative))
        .unwrap_or_else(|e| panic!("missing {}: {}", relative, e))
}

#[test]
fn test_generate_site() {
    let site = sample_site();
    let blog = Blog::new(site.path()).unwrap();
    let summary = blog.generate().unwrap();

    assert_eq!(summary.posts, 4);
    assert!(summary.listing_pages > 1);

    let root = site.path();
    for page in [
        "index.html",
        "page/2/index.html",
        "section/languages-frameworks/index.html",
        "section/languages-frameworks/category/python/index.html",
        "section/data-ai/category/llm/index.html",
        "category/cooking/index.html",
        "series/python/index.html",
        "gil/index.html",
        "refcount/index.html",
        "attention/index.html",
        "sourdough/index.html",
    ] {
        assert!(root.join("public").join(page).exists(), "{} not generated", page);
    }

    // Drafts are skipped and empty listings are not rendered
    assert!(!root.join("public/wip").exists());
    assert!(!root.join("public/page/3").exists());
    assert!(!root.join("public/section/data-ai/category/deep-learning").exists());

    assert!(root.join("public/assets/main.css").exists());
    assert!(root.join("public/assets/main.js").exists());
    assert!(root.join("public/favicon.ico").exists());
    assert!(root.join("public/gil/cover.png").exists());
}

#[test]
fn test_post_page() {
    let site = sample_site();
    Blog::new(site.path()).unwrap().generate().unwrap();

    let html = read(site.path(), "gil/index.html");
    assert!(html.contains("<title>The GIL | Test Log</title>"));
    assert!(html.contains(r#"class="copy-button""#));
    assert!(html.contains(r#"<script type="application/ld+json">"#));
    assert!(html.contains(r#""Article""#));
    assert!(html.contains("BreadcrumbList"));
    assert!(html.contains(r#"content="article""#));
    assert!(html.contains("google-site-verification"));
    assert!(html.contains("@tester"));
    assert!(html.contains("series-box"));
    assert!(html.contains("Reference Counting"));
}

#[test]
fn test_listing_pages() {
    let site = sample_site();
    Blog::new(site.path()).unwrap().generate().unwrap();

    let home = read(site.path(), "index.html");
    assert!(home.contains("The GIL"));
    assert!(home.contains("Reference Counting"));
    assert!(!home.contains("Sourdough"));
    assert!(home.contains("carousel"));
    assert!(home.contains("Python Internals"));

    let second = read(site.path(), "page/2/index.html");
    assert!(second.contains("Sourdough"));

    let llm = read(site.path(), "section/data-ai/category/llm/index.html");
    assert!(llm.contains("Attention"));
    assert!(!llm.contains("Reference Counting"));
}

#[test]
fn test_sitemap_and_robots() {
    let site = sample_site();
    Blog::new(site.path()).unwrap().generate().unwrap();

    let sitemap = read(site.path(), "sitemap.xml");
    assert!(sitemap.contains("<loc>https://blog.example.com/</loc>"));
    assert!(sitemap.contains("<loc>https://blog.example.com/gil/</loc>"));
    assert!(sitemap.contains("<loc>https://blog.example.com/series/python/</loc>"));
    assert!(!sitemap.contains("/wip/"));

    let robots = read(site.path(), "robots.txt");
    assert!(robots.contains("User-agent: *"));
    assert!(robots.contains("Disallow: /drafts/"));
    assert!(robots.contains("Sitemap: https://blog.example.com/sitemap.xml"));
}

#[test]
fn test_clean() {
    let site = sample_site();
    let blog = Blog::new(site.path()).unwrap();
    blog.generate().unwrap();
    assert!(blog.public_dir.exists());

    blog.clean().unwrap();
    assert!(!blog.public_dir.exists());
}

#[test]
fn test_root_post_keeps_home_listing() {
    let site = sample_site();
    fs::write(
        site.path().join("contents/index.md"),
        "---\ntitle: About Me\ndate: 2025-05-01\n---\nHello.\n",
    )
    .unwrap();

    let summary = Blog::new(site.path()).unwrap().generate().unwrap();
    assert_eq!(summary.posts, 4);
    assert_eq!(summary.skipped_posts, 1);

    let home = read(site.path(), "index.html");
    assert!(home.contains("data-carousel"));
    assert!(!home.contains("About Me"));
}

#[test]
fn test_symbol_categories_get_their_own_listings() {
    let site = sample_site();
    write_post(site.path(), "pointers", "title: Pointers\ndate: 2025-01-10\ncategory: C", "*p");
    write_post(site.path(), "templates", "title: Templates\ndate: 2025-01-11\ncategory: C++", "T");

    Blog::new(site.path()).unwrap().generate().unwrap();

    let c = read(site.path(), "category/c/index.html");
    assert!(c.contains("Pointers"));
    assert!(!c.contains("Templates"));

    let cpp = read(site.path(), "category/c-plus-plus/index.html");
    assert!(cpp.contains("Templates"));
    assert!(!cpp.contains("Pointers"));

    // Reachable from the menu on every page
    let home = read(site.path(), "index.html");
    assert!(home.contains(">Other<"));
}
