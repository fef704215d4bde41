//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::DEFAULT_CATEGORY;
use crate::Blog;

/// Create `contents/<slug>/index.md` from the scaffold.
///
/// Uses `scaffolds/post.md` when present. Refuses to overwrite an existing post.
pub fn create_post(
    blog: &Blog,
    title: &str,
    category: Option<&str>,
    series: Option<&str>,
) -> Result<PathBuf> {
    let now = chrono::Utc::now().with_timezone(&blog.config.tz());

    let mut slug = slug::slugify(title);
    if slug.is_empty() {
        slug = format!("post-{}", now.format("%Y%m%d-%H%M%S"));
    }

    let target_dir = blog.source_dir.join(&slug);
    let file_path = target_dir.join("index.md");
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = blog.base_dir.join("scaffolds").join("post.md");
    let mut scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        default_scaffold(series.is_some())
    };
    if series.is_some() && !scaffold_content.contains("{{ series }}") {
        scaffold_content = with_series_fields(&scaffold_content);
    }

    // Quoted so titles with `:` or `#` stay valid YAML
    let content = scaffold_content
        .replace("{{ title }}", &serde_json::to_string(title)?)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string())
        .replace(
            "{{ category }}",
            &serde_json::to_string(category.unwrap_or(DEFAULT_CATEGORY))?,
        )
        .replace("{{ series }}", &serde_json::to_string(series.unwrap_or_default())?);

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

fn default_scaffold(with_series: bool) -> String {
    let mut scaffold = String::from(
        "---\ntitle: {{ title }}\ndate: {{ date }}\ncategory: {{ category }}\nsummary: \"\"\nthumbnail: \"\"\n",
    );
    if with_series {
        scaffold.push_str("series: {{ series }}\nseriesOrder: 1\n");
    }
    scaffold.push_str("draft: false\n---\n");
    scaffold
}

/// Add series fields just before the closing front-matter fence
fn with_series_fields(scaffold: &str) -> String {
    const FIELDS: &str = "series: {{ series }}\nseriesOrder: 1\n";
    match scaffold.rfind("\n---") {
        Some(end) if end > 0 => format!("{}\n{}{}", &scaffold[..end], FIELDS, &scaffold[end + 1..]),
        _ => format!("---\n{}---\n{}", FIELDS, scaffold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        let path = create_post(&blog, "FastAPI: Dependency Injection", Some("FastAPI"), Some("fastapi"))
            .unwrap();
        assert_eq!(
            path,
            dir.path().join("contents/fastapi-dependency-injection/index.md")
        );

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("FastAPI: Dependency Injection"));
        assert_eq!(fm.category.as_deref(), Some("FastAPI"));
        assert_eq!(fm.series.as_deref(), Some("fastapi"));
        assert_eq!(fm.series_order, Some(1));
        assert!(!fm.draft);
    }

    #[test]
    fn test_custom_scaffold_gets_series() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.md"),
            "---\ntitle: {{ title }}\ndate: {{ date }}\n---\n",
        )
        .unwrap();

        let path = create_post(&blog, "GIL", None, Some("python")).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let (fm, body) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.series.as_deref(), Some("python"));
        assert_eq!(fm.series_order, Some(1));
        assert!(body.trim().is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        create_post(&blog, "Hello", None, None).unwrap();
        assert!(create_post(&blog, "Hello", None, None).is_err());
    }
}
