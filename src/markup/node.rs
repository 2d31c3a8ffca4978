//! Compiled document tree

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A structural tag prop value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PropValue>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::String(s) => f.write_str(s),
            PropValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Props of a structural tag, in declaration order
pub type Props = IndexMap<String, PropValue>;

/// Column alignment of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// One node of a compiled document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Strikethrough {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    SoftBreak,
    HardBreak,
    Paragraph {
        children: Vec<Node>,
    },
    /// `number` holds a leading numbering token such as `01`
    Heading {
        level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<String>,
        children: Vec<Node>,
    },
    List {
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        items: Vec<Node>,
    },
    ListItem {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<Node>,
    },
    BlockQuote {
        children: Vec<Node>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        code: String,
    },
    Rule,
    Table {
        alignments: Vec<Alignment>,
        head: Vec<Vec<Node>>,
        rows: Vec<Vec<Vec<Node>>>,
    },
    /// Raw lowercase HTML passed through untouched
    Html {
        value: String,
    },
    /// An embedded component, rendered by the renderer registered for `tag`
    Structural {
        tag: String,
        #[serde(default)]
        props: Props,
        #[serde(default)]
        children: Vec<Node>,
    },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Child nodes, for every variant that has them
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Strikethrough { children }
            | Node::Link { children, .. }
            | Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::ListItem { children, .. }
            | Node::BlockQuote { children }
            | Node::Structural { children, .. } => children,
            Node::List { items, .. } => items,
            _ => &[],
        }
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        if let Node::Table { head, rows, .. } = self {
            for cell in head.iter().chain(rows.iter().flatten()) {
                for node in cell {
                    node.walk(visit);
                }
            }
        }
        for child in self.children() {
            child.walk(visit);
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text { value } | Node::InlineCode { value } => out.push_str(value),
            Node::CodeBlock { code, .. } => out.push_str(code),
            Node::SoftBreak | Node::HardBreak => out.push('\n'),
            Node::Image { alt, .. } => out.push_str(alt),
            Node::Heading {
                number: Some(number),
                children,
                ..
            } => {
                out.push_str(number);
                out.push(' ');
                for child in children {
                    child.push_text(out);
                }
            }
            Node::Table { head, rows, .. } => {
                for cell in head.iter().chain(rows.iter().flatten()) {
                    for node in cell {
                        node.push_text(out);
                    }
                }
            }
            other => {
                for child in other.children() {
                    child.push_text(out);
                }
            }
        }
    }
}

/// A compiled body: plain data, independent of any renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every structural tag used anywhere in the document
    pub fn structural_tags(&self) -> BTreeSet<&str> {
        let mut tags = BTreeSet::new();
        for node in &self.nodes {
            node.walk(&mut |n| {
                if let Node::Structural { tag, .. } = n {
                    tags.insert(tag.as_str());
                }
            });
        }
        tags
    }

    /// Text content without markup
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.push_text(&mut out);
        }
        out
    }

    /// Number of whitespace separated words in the text content
    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut props = Props::new();
        props.insert("title".to_string(), PropValue::String("Note".to_string()));
        Document::new(vec![
            Node::Heading {
                level: 2,
                number: Some("01".to_string()),
                children: vec![Node::text("Intro")],
            },
            Node::Structural {
                tag: "Callout".to_string(),
                props,
                children: vec![Node::Paragraph {
                    children: vec![
                        Node::text("Some "),
                        Node::Structural {
                            tag: "Highlight".to_string(),
                            props: Props::new(),
                            children: vec![Node::text("words")],
                        },
                    ],
                }],
            },
        ])
    }

    #[test]
    fn test_structural_tags_are_collected_recursively() {
        let doc = sample();
        let tags: Vec<_> = doc.structural_tags().into_iter().collect();
        assert_eq!(tags, vec!["Callout", "Highlight"]);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(sample().plain_text(), "01 IntroSome words");
        assert_eq!(sample().word_count(), 3);
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["nodes"][0]["type"], "heading");
        assert_eq!(json["nodes"][0]["number"], "01");
        assert_eq!(json["nodes"][1]["type"], "structural");
        assert_eq!(json["nodes"][1]["props"]["title"], "Note");

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_prop_value_display() {
        let list = PropValue::List(vec![
            PropValue::String("Rust".to_string()),
            PropValue::Number(2.5),
            PropValue::Bool(true),
        ]);
        assert_eq!(list.to_string(), "Rust, 2.5, true");
    }
}
