//! Initialize a new portfolio site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::Folio;

const CONFIG: &str = r#"# folio configuration

# Site
title: Portfolio
description: Personal portfolio and blog
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directories
content_dir: content
data_dir: .folio
public_dir: public

# Writing
date_format: MMMM D, YYYY
teaser_posts: 3
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: true

# Development server
server:
  ip: localhost
  port: 4000
"#;

const SAMPLE_WORK: &str = r#"---
title: Sample Project
subtitle: A case study scaffold to replace with your own work
date: 2024-06-01
timeline: "3 months"
role: Lead Developer
techStack: [Rust, TypeScript]
featured: true
---

<SectionHeader number="01" title="The Challenge" />

<Lead>
What problem did the project solve?
</Lead>

<StatGrid>
<StatCard label="Load time" value="0.8s" subtext="down from 3.2s" trend="down" icon="gauge" />
</StatGrid>

<CTA title="See it live" description="The project is online." href="https://example.com" linkText="Visit site" />
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join(CONFIG_FILE).exists() {
        bail!("{} already exists in {:?}", CONFIG_FILE, target_dir);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("content/works"))?;
    fs::write(target_dir.join(CONFIG_FILE), CONFIG)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
category: General
readTime: 1 min read
excerpt: The first post of this site.
featured: true
---

Welcome to your new portfolio. Posts live in `content/posts` and case studies
in `content/works`.

## 01 Quick Start

```bash
$ folio new "My New Post"
$ folio server
```

<Callout title="Components">
Posts can use components such as <Highlight>Callout</Highlight> and <Badge variant="info">Badge</Badge>.
</Callout>
"#,
        today
    );

    fs::write(target_dir.join("content/posts/hello-world.mdx"), sample_post)?;
    fs::write(target_dir.join("content/works/sample-project.mdx"), SAMPLE_WORK)?;

    Ok(())
}

/// Run the init command with an existing site instance
pub fn run(folio: &Folio) -> Result<()> {
    init_site(&folio.base_dir)
}
