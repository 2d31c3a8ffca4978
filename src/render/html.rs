//! HTML writer for compiled documents

use super::highlight::{plain_code_block, Highlighter};
use super::ComponentRegistry;
use crate::error::RenderError;
use crate::helpers::{html_escape, is_external};
use crate::markup::{Alignment, Document, Node};

/// Writes document trees as HTML, dispatching structural nodes to a
/// component registry
pub(crate) struct HtmlWriter<'a> {
    pub registry: &'a ComponentRegistry,
    pub highlighter: Option<&'a Highlighter>,
}

impl HtmlWriter<'_> {
    pub fn document(&self, document: &Document) -> Result<String, RenderError> {
        let mut out = String::new();
        self.nodes(&document.nodes, &mut out)?;
        Ok(out)
    }

    fn nodes(&self, nodes: &[Node], out: &mut String) -> Result<(), RenderError> {
        for node in nodes {
            self.node(node, out)?;
        }
        Ok(())
    }

    fn wrap(&self, tag: &str, children: &[Node], out: &mut String) -> Result<(), RenderError> {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        self.nodes(children, out)?;
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Ok(())
    }

    fn node(&self, node: &Node, out: &mut String) -> Result<(), RenderError> {
        match node {
            Node::Text { value } => out.push_str(&html_escape(value)),
            Node::Emphasis { children } => self.wrap("em", children, out)?,
            Node::Strong { children } => self.wrap("strong", children, out)?,
            Node::Strikethrough { children } => self.wrap("del", children, out)?,
            Node::InlineCode { value } => {
                out.push_str("<code>");
                out.push_str(&html_escape(value));
                out.push_str("</code>");
            }
            Node::Link {
                href,
                title,
                children,
            } => {
                out.push_str(&format!("<a href=\"{}\"", html_escape(href)));
                if let Some(title) = title {
                    out.push_str(&format!(" title=\"{}\"", html_escape(title)));
                }
                if is_external(href) {
                    out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                }
                out.push('>');
                self.nodes(children, out)?;
                out.push_str("</a>");
            }
            Node::Image { src, alt, title } => {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"",
                    html_escape(src),
                    html_escape(alt)
                ));
                if let Some(title) = title {
                    out.push_str(&format!(" title=\"{}\"", html_escape(title)));
                }
                out.push_str(" />");
            }
            Node::SoftBreak => out.push('\n'),
            Node::HardBreak => out.push_str("<br />\n"),
            Node::Paragraph { children } => {
                self.wrap("p", children, out)?;
                out.push('\n');
            }
            Node::Heading {
                level,
                number,
                children,
            } => {
                let level = (*level).clamp(1, 6);
                let id = slug::slugify(Document::new(children.clone()).plain_text());
                if id.is_empty() {
                    out.push_str(&format!("<h{}>", level));
                } else {
                    out.push_str(&format!("<h{} id=\"{}\">", level, id));
                }
                if let Some(number) = number {
                    out.push_str(&format!(
                        "<span class=\"heading-number\">{}</span> ",
                        html_escape(number)
                    ));
                }
                self.nodes(children, out)?;
                out.push_str(&format!("</h{}>\n", level));
            }
            Node::List {
                ordered,
                start,
                items,
            } => {
                let tag = if *ordered { "ol" } else { "ul" };
                match start {
                    Some(n) if *ordered && *n != 1 => {
                        out.push_str(&format!("<ol start=\"{}\">\n", n))
                    }
                    _ => out.push_str(&format!("<{}>\n", tag)),
                }
                self.nodes(items, out)?;
                out.push_str(&format!("</{}>\n", tag));
            }
            Node::ListItem { checked, children } => {
                out.push_str("<li>");
                match checked {
                    Some(true) => out.push_str("<input type=\"checkbox\" disabled checked /> "),
                    Some(false) => out.push_str("<input type=\"checkbox\" disabled /> "),
                    None => {}
                }
                self.nodes(children, out)?;
                out.push_str("</li>\n");
            }
            Node::BlockQuote { children } => {
                out.push_str("<blockquote>\n");
                self.nodes(children, out)?;
                out.push_str("</blockquote>\n");
            }
            Node::CodeBlock { lang, code } => {
                let html = match self.highlighter {
                    Some(highlighter) => highlighter.highlight(code, lang.as_deref()),
                    None => plain_code_block(code, lang.as_deref()),
                };
                out.push_str(&html);
                out.push('\n');
            }
            Node::Rule => out.push_str("<hr />\n"),
            Node::Table {
                alignments,
                head,
                rows,
            } => {
                out.push_str("<table>\n<thead>\n<tr>");
                for (i, cell) in head.iter().enumerate() {
                    self.cell("th", alignments.get(i), cell, out)?;
                }
                out.push_str("</tr>\n</thead>\n<tbody>\n");
                for row in rows {
                    out.push_str("<tr>");
                    for (i, cell) in row.iter().enumerate() {
                        self.cell("td", alignments.get(i), cell, out)?;
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n</table>\n");
            }
            Node::Html { value } => out.push_str(value),
            Node::Structural {
                tag,
                props,
                children,
            } => {
                let mut inner = String::new();
                self.nodes(children, &mut inner)?;
                out.push_str(&self.registry.render(tag, props, &inner)?);
            }
        }
        Ok(())
    }

    fn cell(
        &self,
        tag: &str,
        alignment: Option<&Alignment>,
        children: &[Node],
        out: &mut String,
    ) -> Result<(), RenderError> {
        let style = match alignment {
            Some(Alignment::Left) => " style=\"text-align: left\"",
            Some(Alignment::Center) => " style=\"text-align: center\"",
            Some(Alignment::Right) => " style=\"text-align: right\"",
            _ => "",
        };
        out.push_str(&format!("<{}{}>", tag, style));
        self.nodes(children, out)?;
        out.push_str(&format!("</{}>", tag));
        Ok(())
    }
}
