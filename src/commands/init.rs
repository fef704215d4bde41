//! Initialize a new devlog site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# devlog configuration

# Site
title: devlog
description: ''
author: John Doe
language: ko
timezone: Asia/Seoul
# twitter: '@handle'
# site_verification:
#   google: <code>
#   naver: <code>

# URL
url: http://example.com
root: /

# Directory
source_dir: contents
public_dir: public
static_dir: static

# Writing
render_drafts: false
external_link:
  enable: true
  target: _blank
  rel: nofollow
highlight:
  theme: base16-ocean.dark

# Listing
per_page: 10
featured_count: 5
carousel_interval_ms: 5000

# Taxonomy
sections:
  - id: cs-fundamentals
    name: CS Fundamentals
    categories: [Operating Systems, Data Structures, Networking, Database]
  - id: languages-frameworks
    name: Languages & Frameworks
    categories: [Python, FastAPI, TypeScript, Next.js]
  - id: data-ai
    name: Data & AI
    categories: [Machine Learning, Deep Learning, LLM]
  - id: architecture
    name: Architecture
    categories: [System Design, Software Engineering]
  - id: infrastructure
    name: Infrastructure
    categories: [Linux & Cloud, DevOps, MLOps]

series:
  python:
    title: Python
    description: GIL, 참조 카운팅, GC, 스레드 동기화
    color: '#3776ab'
  fastapi:
    title: FastAPI
    description: 구조화, DI, 인증, 배포까지
    color: '#099889'

# SEO
robots:
  allow: [/]
  disallow: []
"#;

const POST_SCAFFOLD: &str = r#"---
title: {{ title }}
date: {{ date }}
category: {{ category }}
summary: ""
thumbnail: ""
draft: false
---
"#;

const HELLO_WORLD: &str = r#"---
title: Hello World
date: 2024-01-01 09:00:00
category: Software Engineering
summary: The first post on a new devlog.
---

Welcome to your new devlog. Posts live in `contents/<slug>/index.md`.

## Quick Start

### Create a new post

```bash
devlog new "My New Post" --category Python
```

### Run server

```bash
devlog server
```

### Generate static files

```bash
devlog generate
```
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("contents/hello-world"))?;
    fs::create_dir_all(target_dir.join("static"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    fs::write(target_dir.join("scaffolds/post.md"), POST_SCAFFOLD)?;
    fs::write(
        target_dir.join("contents/hello-world/index.md"),
        HELLO_WORLD,
    )?;

    tracing::info!("Initialized site in {:?}", target_dir);

    Ok(())
}
