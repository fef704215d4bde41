//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::generator::{GenerateSummary, Generator};
use crate::Blog;

/// Load every post and build the site
pub fn run(blog: &Blog) -> Result<GenerateSummary> {
    let start = std::time::Instant::now();

    let posts = ContentLoader::new(blog).load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let summary = Generator::new(blog)?.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(summary)
}

/// Watch content, static files and the config, regenerating on change.
///
/// Blocks until the watcher shuts down.
pub fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&blog.source_dir, &blog.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = blog.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for result in rx {
        match result {
            Ok(events) => {
                for event in &events {
                    tracing::debug!("File changed: {:?}", event.path);
                }

                // Pick up config edits too
                let blog = match Blog::new(&blog.base_dir) {
                    Ok(blog) => blog,
                    Err(e) => {
                        tracing::error!("Failed to reload config: {:#}", e);
                        continue;
                    }
                };

                tracing::info!("File changed, regenerating...");
                if let Err(e) = run(&blog) {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}
