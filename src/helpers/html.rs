//! HTML helper functions

use super::url::{is_external, url_for};
use crate::config::SiteConfig;

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to(&config, "/posts/", "Blog") // -> <a href="/posts/">Blog</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str) -> String {
    let href = html_escape(&url_for(config, path));
    if is_external(path) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            href,
            html_escape(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, href, html_escape(text))
    }
}

/// Generate a meta tag, omitted when the content is empty
pub fn meta_tag(name: &str, content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    format!(
        r#"<meta name="{}" content="{}">"#,
        html_escape(name),
        html_escape(content)
    )
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="folio {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`html_escape`] and the numeric entities it produces
pub fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = "/".to_string();
        config
    }

    #[test]
    fn test_link_to() {
        let config = test_config();
        assert_eq!(link_to(&config, "/posts/", "Blog"), r#"<a href="/posts/">Blog</a>"#);
        assert!(link_to(&config, "https://github.com", "GitHub").contains("target=\"_blank\""));
    }

    #[test]
    fn test_escape_round_trip() {
        let text = r#"Tom & "Jerry" <3 'cheese'"#;
        assert_eq!(html_unescape(&html_escape(text)), text);
        assert_eq!(html_escape("a<b"), "a&lt;b");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
    }

    #[test]
    fn test_meta_tag() {
        assert_eq!(meta_tag("description", ""), "");
        assert_eq!(
            meta_tag("description", "A \"quoted\" text"),
            r#"<meta name="description" content="A &quot;quoted&quot; text">"#
        );
    }
}
