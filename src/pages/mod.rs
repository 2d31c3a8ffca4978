//! Page shells around rendered entries
//!
//! Minimal HTML documents: the landing page with its blog teaser and
//! featured works, post pages with newer/older navigation, case-study
//! pages and the 404 page.

use crate::config::SiteConfig;
use crate::content::{Entry, Post, Work};
use crate::helpers::{
    html_escape, link_to, meta_generator, meta_tag, time_tag, truncate, url_for,
};
use crate::index::Snapshot;
use crate::render::Rendered;

/// Excerpt length on teaser cards, in characters
const TEASER_EXCERPT: usize = 160;

/// Builds page shells for one site
pub struct PageBuilder<'a> {
    config: &'a SiteConfig,
}

impl<'a> PageBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Wrap a page body in the site layout
    pub fn layout(&self, title: &str, description: Option<&str>, body: &str) -> String {
        let full_title = if title.is_empty() || title == self.config.title {
            html_escape(&self.config.title)
        } else {
            format!(
                "{} | {}",
                html_escape(title),
                html_escape(&self.config.title)
            )
        };
        let description = description.unwrap_or(&self.config.description);

        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{description}
{author}
{generator}
</head>
<body>
<header class="site-header"><nav>{home} {blog} {work}</nav></header>
<main>
{body}
</main>
<footer class="site-footer"><p>&copy; {author_name}</p></footer>
</body>
</html>
"#,
            lang = html_escape(&self.config.language),
            title = full_title,
            description = meta_tag("description", description),
            author = meta_tag("author", &self.config.author),
            generator = meta_generator(),
            home = link_to(self.config, "/", &self.config.title),
            blog = link_to(self.config, "/#blog", "Blog"),
            work = link_to(self.config, "/#work", "Work"),
            body = body,
            author_name = html_escape(&self.config.author),
        )
    }

    /// A blog post with links to its newer and older neighbours
    pub fn post_page(&self, snapshot: &Snapshot, rendered: &Rendered<Post>) -> String {
        let post = &rendered.entity;
        let (newer, older) = snapshot.posts.neighbors(&post.slug);

        let mut nav = String::new();
        if let Some(newer) = newer {
            nav.push_str(&format!(
                "<span class=\"newer\">{}</span>",
                link_to(self.config, &newer.path(), &newer.title)
            ));
        }
        if let Some(older) = older {
            nav.push_str(&format!(
                "<span class=\"older\">{}</span>",
                link_to(self.config, &older.path(), &older.title)
            ));
        }

        let body = format!(
            r#"<article class="post">
<header>
<p class="post-meta"><span class="category">{category}</span> {date} <span class="read-time">{read_time}</span></p>
<h1>{title}</h1>
</header>
<div class="post-content">
{content}</div>
<nav class="post-nav">{nav}</nav>
</article>"#,
            category = html_escape(&post.category),
            date = time_tag(&post.date, &self.config.date_format),
            read_time = html_escape(&post.read_time),
            title = html_escape(&post.title),
            content = rendered.html,
            nav = nav,
        );

        self.layout(&post.title, rendered.meta.description.as_deref(), &body)
    }

    /// A case study with its project facts
    pub fn work_page(&self, rendered: &Rendered<Work>) -> String {
        let work = &rendered.entity;

        let stack: String = work
            .tech_stack
            .iter()
            .map(|tech| format!("<li>{}</li>", html_escape(tech)))
            .collect();
        let mut links = String::new();
        if let Some(live) = &work.live_url {
            links.push_str(&link_to(self.config, live, "Visit site"));
        }
        if let Some(video) = &work.video_url {
            links.push_str(&link_to(self.config, video, "Watch video"));
        }

        let body = format!(
            r#"<article class="case-study">
<header>
<h1>{title}</h1>
<p class="subtitle">{subtitle}</p>
<dl class="facts"><dt>Timeline</dt><dd>{timeline}</dd><dt>Role</dt><dd>{role}</dd></dl>
<ul class="tech-stack">{stack}</ul>
<p class="links">{links}</p>
</header>
<div class="case-study-content">
{content}</div>
</article>"#,
            title = html_escape(&work.title),
            subtitle = html_escape(&work.subtitle),
            timeline = html_escape(&work.timeline),
            role = html_escape(&work.role),
            stack = stack,
            links = links,
            content = rendered.html,
        );

        self.layout(&work.title, rendered.meta.description.as_deref(), &body)
    }

    /// Landing page: featured works and the most recent posts
    pub fn home_page(&self, snapshot: &Snapshot) -> String {
        let works: String = snapshot
            .works
            .featured()
            .into_iter()
            .map(|work| {
                format!(
                    "<li class=\"work-card\"><h3>{}</h3><p>{}</p></li>\n",
                    link_to(self.config, &work.path(), &work.title),
                    html_escape(&work.subtitle)
                )
            })
            .collect();

        let posts: String = snapshot
            .posts
            .recent(self.config.teaser_posts)
            .iter()
            .map(|post| {
                let excerpt = post
                    .excerpt
                    .as_deref()
                    .map(|e| truncate(e, TEASER_EXCERPT, None))
                    .unwrap_or_default();
                format!(
                    "<li class=\"post-card\"><p class=\"post-meta\">{} {}</p><h3>{}</h3><p>{}</p></li>\n",
                    html_escape(&post.category),
                    time_tag(&post.date, &self.config.date_format),
                    link_to(self.config, &post.path(), &post.title),
                    html_escape(&excerpt)
                )
            })
            .collect();

        let body = format!(
            r#"<section class="hero"><h1>{title}</h1><p>{description}</p></section>
<section id="work"><h2>Selected work</h2>
<ul class="work-list">
{works}</ul>
</section>
<section id="blog"><h2>Latest posts</h2>
<ul class="post-list">
{posts}</ul>
</section>"#,
            title = html_escape(&self.config.title),
            description = html_escape(&self.config.description),
            works = works,
            posts = posts,
        );

        self.layout(&self.config.title, None, &body)
    }

    pub fn not_found_page(&self) -> String {
        let body = format!(
            "<section class=\"not-found\"><h1>Page not found</h1><p>{}</p></section>",
            link_to(self.config, "/", "Back to the start page")
        );
        self.layout("Not found", None, &body)
    }

    /// Absolute URL path of a page under the site root
    pub fn url(&self, path: &str) -> String {
        url_for(self.config, path)
    }
}
