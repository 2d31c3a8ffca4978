//! The site's standard component set, as plain semantic HTML

use crate::error::RenderError;
use crate::helpers::{html_escape, is_external};
use crate::markup::{PropValue, Props};

use super::ComponentRegistry;

/// Icon names accepted by `StatCard` and `FeatureCard`
pub const ICONS: &[&str] = &[
    "zap",
    "gauge",
    "lineChart",
    "search",
    "trendingUp",
    "server",
    "users",
    "checkCircle",
];

/// Registry holding every standard component
pub fn standard() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();

    // Layout
    registry.insert_fn("Section", |props, children| {
        let class = optional(props, "className")
            .map(|c| format!("section {}", c))
            .unwrap_or_else(|| "section".to_string());
        Ok(format!(
            "<section class=\"{}\">\n{}</section>\n",
            html_escape(&class),
            children
        ))
    });
    registry.insert_fn("SectionHeader", |props, _| {
        let number = required("SectionHeader", props, "number")?;
        let title = required("SectionHeader", props, "title")?;
        Ok(format!(
            "<div class=\"section-header\"><span class=\"section-number\">{}</span><h2>{}</h2></div>\n",
            html_escape(&number),
            html_escape(&title)
        ))
    });
    registry.insert_fn("Separator", |_, _| Ok("<hr class=\"separator\" />\n".to_string()));

    // Typography
    registry.insert_fn("Lead", |_, children| {
        Ok(format!("<p class=\"lead\">{}</p>\n", unwrap_paragraph(children)))
    });
    registry.insert_fn("Prose", |_, children| {
        Ok(format!("<div class=\"prose\">\n{}</div>\n", children))
    });
    registry.insert_fn("Highlight", |_, children| {
        Ok(format!("<span class=\"highlight\">{}</span>", children))
    });
    registry.insert_fn("Subheading", |_, children| {
        Ok(format!("<h3 class=\"subheading\">{}</h3>\n", unwrap_paragraph(children)))
    });

    // Content blocks
    registry.insert_fn("Callout", |props, children| {
        let title = optional(props, "title")
            .map(|t| format!("<p class=\"callout-title\">{}</p>", html_escape(&t)))
            .unwrap_or_default();
        Ok(format!(
            "<aside class=\"callout\">{}<div class=\"callout-body\">\n{}</div></aside>\n",
            title, children
        ))
    });
    registry.insert_fn("Blockquote", |props, children| {
        let author = optional(props, "author")
            .map(|a| format!("<footer>{}</footer>", html_escape(&a)))
            .unwrap_or_default();
        Ok(format!(
            "<blockquote class=\"quote\">\n{}{}</blockquote>\n",
            children, author
        ))
    });

    // Stats
    registry.insert_fn("StatGrid", |_, children| {
        Ok(format!("<div class=\"stat-grid\">\n{}</div>\n", children))
    });
    registry.insert_fn("StatCard", |props, _| {
        let label = required("StatCard", props, "label")?;
        let value = required("StatCard", props, "value")?;
        let subtext = optional(props, "subtext").unwrap_or_default();
        let trend = required("StatCard", props, "trend")?;
        if trend != "up" && trend != "down" {
            return Err(RenderError::invalid_prop(
                "StatCard",
                "trend",
                format!("must be \"up\" or \"down\", got {:?}", trend),
            ));
        }
        let icon = icon("StatCard", props)?;
        Ok(format!(
            "<div class=\"stat-card\" data-trend=\"{}\">{}<p class=\"stat-value\">{}</p><p class=\"stat-label\">{}</p><p class=\"stat-subtext\">{}</p></div>\n",
            trend,
            icon,
            html_escape(&value),
            html_escape(&label),
            html_escape(&subtext)
        ))
    });

    // Features
    registry.insert_fn("FeatureGrid", |_, children| {
        Ok(format!("<div class=\"feature-grid\">\n{}</div>\n", children))
    });
    registry.insert_fn("FeatureCard", |props, _| {
        let title = required("FeatureCard", props, "title")?;
        let description = required("FeatureCard", props, "description")?;
        let icon = icon("FeatureCard", props)?;
        if let Some(delay) = props.get("delay") {
            if delay.as_f64().is_none() {
                return Err(RenderError::invalid_prop("FeatureCard", "delay", "must be a number"));
            }
        }
        Ok(format!(
            "<div class=\"feature-card\">{}<h3>{}</h3><p>{}</p></div>\n",
            icon,
            html_escape(&title),
            html_escape(&description)
        ))
    });

    // Check items
    registry.insert_fn("CheckList", |_, children| {
        Ok(format!("<div class=\"check-list\">\n{}</div>\n", children))
    });
    registry.insert_fn("CheckItem", |props, _| {
        let title = required("CheckItem", props, "title")?;
        let description = required("CheckItem", props, "description")?;
        Ok(format!(
            "<div class=\"check-item\"><span class=\"icon\" data-icon=\"checkCircle\"></span><div><p class=\"check-title\">{}</p><p>{}</p></div></div>\n",
            html_escape(&title),
            html_escape(&description)
        ))
    });

    // CTA
    registry.insert_fn("CTA", |props, _| {
        let title = required("CTA", props, "title")?;
        let description = required("CTA", props, "description")?;
        let href = required("CTA", props, "href")?;
        let link_text = required("CTA", props, "linkText")?;
        let target = if is_external(&href) {
            " target=\"_blank\" rel=\"noopener noreferrer\""
        } else {
            ""
        };
        Ok(format!(
            "<section class=\"cta\"><hr class=\"separator\" /><div><p class=\"cta-title\">{}</p><p>{}</p></div><a class=\"button\" href=\"{}\"{}>{}</a></section>\n",
            html_escape(&title),
            html_escape(&description),
            html_escape(&href),
            target,
            html_escape(&link_text)
        ))
    });

    registry.insert_fn("Badge", |props, children| {
        let variant = optional(props, "variant").unwrap_or_else(|| "default".to_string());
        Ok(format!(
            "<span class=\"badge badge-{}\">{}</span>",
            html_escape(&variant),
            unwrap_paragraph(children)
        ))
    });

    registry
}

/// A prop that must be present and scalar, as text
fn required(tag: &str, props: &Props, prop: &str) -> Result<String, RenderError> {
    match props.get(prop) {
        None => Err(RenderError::invalid_prop(tag, prop, "is required")),
        Some(PropValue::List(_)) => Err(RenderError::invalid_prop(tag, prop, "must not be a list")),
        Some(value) => Ok(value.to_string()),
    }
}

fn optional(props: &Props, prop: &str) -> Option<String> {
    props.get(prop).map(PropValue::to_string)
}

fn icon(tag: &str, props: &Props) -> Result<String, RenderError> {
    let name = required(tag, props, "icon")?;
    if !ICONS.contains(&name.as_str()) {
        return Err(RenderError::invalid_prop(
            tag,
            "icon",
            format!("unknown icon {:?}", name),
        ));
    }
    Ok(format!(
        "<span class=\"icon\" data-icon=\"{}\"></span>",
        name
    ))
}

/// Children of inline components arrive wrapped in a paragraph when the
/// author wrote them on their own lines
fn unwrap_paragraph(children: &str) -> &str {
    let trimmed = children.trim();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner,
        _ => trimmed,
    }
}
