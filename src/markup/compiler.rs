//! Markup compiler: Markdown bodies with embedded structural tags into
//! document trees
//!
//! Compilation runs in two passes. A line scanner lifts block-level
//! structural tags (a tag alone on its line, closed further down) out of the
//! text and compiles their content recursively. The prose between them goes
//! through pulldown-cmark, whose event stream is folded into nodes; inline
//! structural tags surface there as inline HTML and are matched up on a
//! frame stack.

use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use regex::Regex;
use std::ops::Range;

use super::node::{Alignment, Document, Node, Props};
use super::tag;
use crate::error::MarkupError;

lazy_static! {
    static ref HEADING_NUMBER: Regex = Regex::new(r"^(\d{2})\.?\s+").unwrap();
}

/// Compile a body into a document
pub fn compile(source: &str) -> Result<Document, MarkupError> {
    compile_blocks(source, 0).map(Document::new)
}

/// `base` is the number of lines preceding `src` in the whole body
fn compile_blocks(src: &str, base: usize) -> Result<Vec<Node>, MarkupError> {
    let mut nodes = Vec::new();
    let mut prose_start = 0;
    let mut pos = 0;
    let mut fence: Option<&str> = None;

    while pos < src.len() {
        let line_end = next_line(src, pos);
        let line = &src[pos..line_end];
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            pos = line_end;
            continue;
        }
        if indent >= 4 {
            pos = line_end;
            continue;
        }
        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
            pos = line_end;
            continue;
        }

        if tag::is_structural_open(trimmed) {
            let tag_start = pos + indent;
            let open = tag::parse_open_tag(src, tag_start)
                .map_err(|e| MarkupError::new(line_at(src, tag_start, base), e))?;
            let open_line_end = next_line(src, open.end);

            // Anything after the tag on its line makes it inline prose
            if src[open.end..open_line_end].trim().is_empty() {
                nodes.extend(compile_prose(
                    &src[prose_start..pos],
                    base + count_lines(&src[..prose_start]),
                )?);

                let (children, after) = if open.self_closing {
                    (Vec::new(), open.end)
                } else {
                    let (close_start, close_end) = find_closing(src, open.end, &open.name)
                        .ok_or_else(|| {
                            MarkupError::new(
                                line_at(src, tag_start, base),
                                format!("<{}> is never closed", open.name),
                            )
                        })?;
                    let children = compile_blocks(
                        &src[open.end..close_start],
                        base + count_lines(&src[..open.end]),
                    )?;
                    (children, close_end)
                };

                nodes.push(Node::Structural {
                    tag: open.name,
                    props: open.props,
                    children,
                });

                pos = after;
                let rest_end = next_line(src, pos);
                if src[pos..rest_end].trim().is_empty() {
                    pos = rest_end;
                }
                prose_start = pos;
                continue;
            }
        }

        pos = line_end;
    }

    nodes.extend(compile_prose(
        &src[prose_start..],
        base + count_lines(&src[..prose_start]),
    )?);
    Ok(nodes)
}

/// Offset just past the end of the line containing `pos`
fn next_line(src: &str, pos: usize) -> usize {
    src[pos..].find('\n').map_or(src.len(), |i| pos + i + 1)
}

fn count_lines(s: &str) -> usize {
    s.matches('\n').count()
}

fn line_at(src: &str, offset: usize, base: usize) -> usize {
    base + count_lines(&src[..offset]) + 1
}

/// Find the `</name>` matching an opening tag whose content starts at
/// `from`. Returns the byte range of the closing tag. Fenced code and
/// backtick code spans are skipped.
fn find_closing(src: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut fence: Option<&str> = None;
    let mut pos = from;

    while pos < src.len() {
        let line_end = next_line(src, pos);
        let trimmed = src[pos..line_end].trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            pos = line_end;
            continue;
        }
        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
            pos = line_end;
            continue;
        }

        let spans = code_spans(&src[pos..line_end]);
        let mut next = line_end;
        let mut i = pos;
        while i < line_end {
            let Some(rel) = src[i..line_end].find('<') else {
                break;
            };
            let at = i + rel;
            if let Some(span) = spans.iter().find(|s| s.contains(&(at - pos))) {
                i = pos + span.end;
                continue;
            }
            let rest = &src[at..];

            if let Some((close_name, len)) = tag::parse_close_tag(rest) {
                if close_name == name {
                    depth -= 1;
                    if depth == 0 {
                        return Some((at, at + len));
                    }
                }
                i = at + len;
                continue;
            }

            let opens_same = rest[1..].strip_prefix(name).is_some_and(|after| {
                after.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/')
            });
            if opens_same {
                if let Ok(open) = tag::parse_open_tag(src, at) {
                    if !open.self_closing {
                        depth += 1;
                    }
                    // A multi-line opening tag resumes the scan after it
                    if open.end >= line_end {
                        next = open.end;
                        break;
                    }
                    i = open.end;
                    continue;
                }
            }
            i = at + 1;
        }
        pos = next;
    }
    None
}

fn fence_marker(trimmed: &str) -> Option<&'static str> {
    ["```", "~~~"].into_iter().find(|m| trimmed.starts_with(m))
}

/// Byte ranges of the backtick code spans on one line
fn code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let run_end = |mut j: usize| {
        while j < bytes.len() && bytes[j] == b'`' {
            j += 1;
        }
        j
    };

    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let start = i;
        i = run_end(i);
        let width = i - start;

        let mut j = i;
        while j < bytes.len() {
            if bytes[j] != b'`' {
                j += 1;
                continue;
            }
            let end = run_end(j);
            if end - j == width {
                spans.push(start..end);
                i = end;
                break;
            }
            j = end;
        }
    }
    spans
}

fn compile_prose(src: &str, base: usize) -> Result<Vec<Node>, MarkupError> {
    if src.trim().is_empty() {
        return Ok(Vec::new());
    }

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = TreeBuilder::new();
    for (event, range) in Parser::new_ext(src, options).into_offset_iter() {
        builder.event(event, line_at(src, range.start, base))?;
    }
    builder.finish()
}

enum Kind {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    List { ordered: bool, start: Option<u64> },
    Item { checked: Option<bool> },
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: Option<String> },
    Image { src: String, title: Option<String> },
    Table(Vec<Alignment>),
    TableHead,
    TableRow,
    TableCell,
    Structural { tag: String, props: Props },
    /// Containers we do not model; their content is spliced into the parent
    Transparent,
}

struct Frame {
    kind: Kind,
    line: usize,
    children: Vec<Node>,
    /// Cells of a table row or head; the head of a table frame
    cells: Vec<Vec<Node>>,
    rows: Vec<Vec<Vec<Node>>>,
}

impl Frame {
    fn new(kind: Kind, line: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::new(),
            cells: Vec::new(),
            rows: Vec::new(),
        }
    }
}

struct CodeState {
    lang: Option<String>,
    code: String,
}

/// Folds pulldown-cmark events into nodes
struct TreeBuilder {
    stack: Vec<Frame>,
    code: Option<CodeState>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Kind::Root, 1)],
            code: None,
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn event(&mut self, event: Event<'_>, line: usize) -> Result<(), MarkupError> {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeState {
                    lang,
                    code: String::new(),
                });
            }
            Event::Text(text) if self.code.is_some() => {
                if let Some(state) = self.code.as_mut() {
                    state.code.push_str(&text);
                }
            }
            Event::End(_) if self.code.is_some() => {
                if let Some(state) = self.code.take() {
                    self.push(Node::CodeBlock {
                        lang: state.lang,
                        code: state.code,
                    });
                }
            }
            Event::Start(tag) => self.open(tag, line),
            Event::End(_) => self.close()?,
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push(Node::InlineCode {
                value: code.to_string(),
            }),
            Event::Html(html) => self.html(html, line, true)?,
            Event::InlineHtml(html) => self.html(html, line, false)?,
            Event::SoftBreak => self.push(Node::SoftBreak),
            Event::HardBreak => self.push(Node::HardBreak),
            Event::Rule => self.push(Node::Rule),
            Event::TaskListMarker(checked) => {
                if let Some(frame) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|f| matches!(f.kind, Kind::Item { .. }))
                {
                    frame.kind = Kind::Item {
                        checked: Some(checked),
                    };
                }
            }
            Event::FootnoteReference(name) => self.push_text(&format!("[^{}]", name)),
            _ => {}
        }
        Ok(())
    }

    fn open(&mut self, tag: Tag<'_>, line: usize) {
        let kind = match tag {
            Tag::Paragraph => Kind::Paragraph,
            Tag::Heading { level, .. } => Kind::Heading(level as u8),
            Tag::BlockQuote { .. } => Kind::BlockQuote,
            Tag::List(start) => Kind::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => Kind::Item { checked: None },
            Tag::Emphasis => Kind::Emphasis,
            Tag::Strong => Kind::Strong,
            Tag::Strikethrough => Kind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Kind::Link {
                href: dest_url.to_string(),
                title: non_empty(title),
            },
            Tag::Image {
                dest_url, title, ..
            } => Kind::Image {
                src: dest_url.to_string(),
                title: non_empty(title),
            },
            Tag::Table(alignments) => Kind::Table(
                alignments
                    .into_iter()
                    .map(|a| match a {
                        pulldown_cmark::Alignment::None => Alignment::None,
                        pulldown_cmark::Alignment::Left => Alignment::Left,
                        pulldown_cmark::Alignment::Center => Alignment::Center,
                        pulldown_cmark::Alignment::Right => Alignment::Right,
                    })
                    .collect(),
            ),
            Tag::TableHead => Kind::TableHead,
            Tag::TableRow => Kind::TableRow,
            Tag::TableCell => Kind::TableCell,
            _ => Kind::Transparent,
        };
        self.stack.push(Frame::new(kind, line));
    }

    fn close(&mut self) -> Result<(), MarkupError> {
        if self.stack.len() <= 1 {
            return Ok(());
        }
        if let Kind::Structural { tag, .. } = &self.top().kind {
            let message = format!("<{}> is not closed before the end of its block", tag);
            return Err(MarkupError::new(self.top().line, message));
        }

        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let node = match frame.kind {
            Kind::Paragraph => unwrap_paragraph(frame.children),
            Kind::Heading(level) => heading(level, frame.children),
            Kind::BlockQuote => Node::BlockQuote {
                children: frame.children,
            },
            Kind::List { ordered, start } => Node::List {
                ordered,
                start,
                items: frame.children,
            },
            Kind::Item { checked } => Node::ListItem {
                checked,
                children: frame.children,
            },
            Kind::Emphasis => Node::Emphasis {
                children: frame.children,
            },
            Kind::Strong => Node::Strong {
                children: frame.children,
            },
            Kind::Strikethrough => Node::Strikethrough {
                children: frame.children,
            },
            Kind::Link { href, title } => Node::Link {
                href,
                title,
                children: frame.children,
            },
            Kind::Image { src, title } => Node::Image {
                src,
                alt: Document::new(frame.children).plain_text(),
                title,
            },
            Kind::Table(alignments) => Node::Table {
                alignments,
                head: frame.cells,
                rows: frame.rows,
            },
            Kind::TableHead => {
                self.top().cells = frame.cells;
                return Ok(());
            }
            Kind::TableRow => {
                self.top().rows.push(frame.cells);
                return Ok(());
            }
            Kind::TableCell => {
                self.top().cells.push(frame.children);
                return Ok(());
            }
            Kind::Transparent => {
                for child in frame.children {
                    self.push(child);
                }
                return Ok(());
            }
            Kind::Root | Kind::Structural { .. } => {
                return Err(MarkupError::new(frame.line, "unbalanced markdown events"))
            }
        };
        self.push(node);
        Ok(())
    }

    fn html(&mut self, html: CowStr<'_>, line: usize, block: bool) -> Result<(), MarkupError> {
        let trimmed = html.trim();

        if tag::is_structural_close(trimmed) {
            let name = tag::parse_close_tag(trimmed)
                .map(|(name, _)| name.to_string())
                .ok_or_else(|| MarkupError::new(line, format!("malformed closing tag {}", trimmed)))?;
            let open_matches =
                matches!(&self.top().kind, Kind::Structural { tag, .. } if *tag == name);
            if block || !open_matches {
                return Err(MarkupError::new(
                    line,
                    format!("unexpected closing tag </{}>", name),
                ));
            }
            let frame = self.stack.pop();
            if let Some(Frame {
                kind: Kind::Structural { tag, props },
                children,
                ..
            }) = frame
            {
                self.push(Node::Structural {
                    tag,
                    props,
                    children,
                });
            }
            return Ok(());
        }

        if tag::is_structural_open(trimmed) {
            if block {
                return Err(MarkupError::new(
                    line,
                    format!(
                        "structural tag {} must stand on its own line or sit inside a paragraph",
                        trimmed.lines().next().unwrap_or(trimmed)
                    ),
                ));
            }
            let open = tag::parse_open_tag(trimmed, 0).map_err(|e| MarkupError::new(line, e))?;
            if open.self_closing {
                self.push(Node::Structural {
                    tag: open.name,
                    props: open.props,
                    children: Vec::new(),
                });
            } else {
                self.stack.push(Frame::new(
                    Kind::Structural {
                        tag: open.name,
                        props: open.props,
                    },
                    line,
                ));
            }
            return Ok(());
        }

        let children = &mut self.top().children;
        match children.last_mut() {
            Some(Node::Html { value }) if block => value.push_str(&html),
            _ => children.push(Node::Html {
                value: html.to_string(),
            }),
        }
        Ok(())
    }

    fn push(&mut self, node: Node) {
        self.top().children.push(node);
    }

    fn push_text(&mut self, text: &str) {
        let children = &mut self.top().children;
        match children.last_mut() {
            Some(Node::Text { value }) => value.push_str(text),
            _ => children.push(Node::text(text)),
        }
    }

    fn finish(mut self) -> Result<Vec<Node>, MarkupError> {
        if let Some(frame) = self.stack.get(1) {
            let message = match &frame.kind {
                Kind::Structural { tag, .. } => format!("<{}> is never closed", tag),
                _ => "unbalanced markdown events".to_string(),
            };
            return Err(MarkupError::new(frame.line, message));
        }
        Ok(std::mem::take(&mut self.top().children))
    }
}

fn non_empty(s: CowStr<'_>) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn is_blank(node: &Node) -> bool {
    match node {
        Node::Text { value } => value.trim().is_empty(),
        Node::SoftBreak | Node::HardBreak => true,
        _ => false,
    }
}

/// A paragraph holding nothing but one structural element becomes that element
fn unwrap_paragraph(children: Vec<Node>) -> Node {
    let mut significant = children.iter().filter(|n| !is_blank(n));
    let single_structural = matches!(
        (significant.next(), significant.next()),
        (Some(Node::Structural { .. }), None)
    );
    if single_structural {
        if let Some(node) = children
            .into_iter()
            .find(|n| matches!(n, Node::Structural { .. }))
        {
            return node;
        }
        return Node::Paragraph {
            children: Vec::new(),
        };
    }
    Node::Paragraph { children }
}

/// Split a leading two-digit numbering token off the heading text
fn heading(level: u8, mut children: Vec<Node>) -> Node {
    let mut number = None;
    let more_children = children.len() > 1;
    let mut drop_first = false;

    if let Some(Node::Text { value }) = children.first_mut() {
        let split = HEADING_NUMBER
            .captures(value)
            .and_then(|caps| Some((caps.get(1)?.as_str().to_string(), caps.get(0)?.end())));
        if let Some((token, end)) = split {
            if end < value.len() || more_children {
                number = Some(token);
                *value = value[end..].to_string();
                drop_first = value.is_empty();
            }
        }
    }
    if drop_first {
        children.remove(0);
    }

    Node::Heading {
        level,
        number,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::node::PropValue;

    fn nodes(src: &str) -> Vec<Node> {
        compile(src).unwrap().nodes
    }

    #[test]
    fn test_plain_prose() {
        let doc = nodes("Hello *world* and **bold** with `code`.\n\nSecond paragraph.\n");
        assert_eq!(doc.len(), 2);
        match &doc[0] {
            Node::Paragraph { children } => {
                assert_eq!(children[0], Node::text("Hello "));
                assert!(matches!(children[1], Node::Emphasis { .. }));
                assert!(matches!(children[3], Node::Strong { .. }));
                assert_eq!(
                    children[5],
                    Node::InlineCode {
                        value: "code".to_string()
                    }
                );
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_number_token() {
        let doc = nodes("## 01 The Challenge\n\n### 02. Approach\n\n## 2024 in review\n");
        assert_eq!(
            doc[0],
            Node::Heading {
                level: 2,
                number: Some("01".to_string()),
                children: vec![Node::text("The Challenge")],
            }
        );
        assert_eq!(
            doc[1],
            Node::Heading {
                level: 3,
                number: Some("02".to_string()),
                children: vec![Node::text("Approach")],
            }
        );
        match &doc[2] {
            Node::Heading { number, children, .. } => {
                assert_eq!(number, &None);
                assert_eq!(children[0], Node::text("2024 in review"));
            }
            other => panic!("expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_number_before_emphasis() {
        let doc = nodes("## 03 *Results*\n");
        match &doc[0] {
            Node::Heading {
                number, children, ..
            } => {
                assert_eq!(number.as_deref(), Some("03"));
                assert_eq!(children.len(), 1);
                assert!(matches!(children[0], Node::Emphasis { .. }));
            }
            other => panic!("expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_ordered_list_start_is_forwarded() {
        let doc = nodes("3. three\n4. four\n");
        match &doc[0] {
            Node::List {
                ordered,
                start,
                items,
            } => {
                assert!(ordered);
                assert_eq!(*start, Some(3));
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_block_structural_tag_with_nested_markdown() {
        let src = r#"Intro.

<Callout title="Heads up">
Some **important** text.

<StatGrid>
  <StatCard label="Speed" value="2x" trend="up" icon="zap" />
</StatGrid>
</Callout>

Outro.
"#;
        let doc = nodes(src);
        assert_eq!(doc.len(), 3);
        match &doc[1] {
            Node::Structural {
                tag,
                props,
                children,
            } => {
                assert_eq!(tag, "Callout");
                assert_eq!(props["title"], PropValue::String("Heads up".to_string()));
                assert!(matches!(children[0], Node::Paragraph { .. }));
                match &children[1] {
                    Node::Structural { tag, children, .. } => {
                        assert_eq!(tag, "StatGrid");
                        assert_eq!(children.len(), 1);
                        assert!(
                            matches!(&children[0], Node::Structural { tag, .. } if tag == "StatCard")
                        );
                    }
                    other => panic!("expected StatGrid, got {:?}", other),
                }
            }
            other => panic!("expected Callout, got {:?}", other),
        }
        assert!(matches!(doc[2], Node::Paragraph { .. }));
    }

    #[test]
    fn test_same_name_nesting() {
        let src = "<Section>\n<Section>\ninner\n</Section>\nouter\n</Section>\n";
        let doc = nodes(src);
        assert_eq!(doc.len(), 1);
        match &doc[0] {
            Node::Structural { children, .. } => {
                assert_eq!(children.len(), 2);
                assert!(matches!(&children[0], Node::Structural { tag, .. } if tag == "Section"));
            }
            other => panic!("expected Section, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_structural_tag() {
        let doc = nodes("This is <Highlight>really</Highlight> good.\n");
        match &doc[0] {
            Node::Paragraph { children } => {
                assert_eq!(children[0], Node::text("This is "));
                assert_eq!(
                    children[1],
                    Node::Structural {
                        tag: "Highlight".to_string(),
                        props: Props::new(),
                        children: vec![Node::text("really")],
                    }
                );
                assert_eq!(children[2], Node::text(" good."));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_lone_inline_tag_is_unwrapped() {
        let doc = nodes("<Lead>A strong opening line.</Lead>\n");
        assert_eq!(
            doc,
            vec![Node::Structural {
                tag: "Lead".to_string(),
                props: Props::new(),
                children: vec![Node::text("A strong opening line.")],
            }]
        );
    }

    #[test]
    fn test_code_fences_are_opaque() {
        let src = "```tsx\n<Callout>\n```\n";
        let doc = nodes(src);
        assert_eq!(
            doc,
            vec![Node::CodeBlock {
                lang: Some("tsx".to_string()),
                code: "<Callout>\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_closing_tag_inside_fence_is_content() {
        let src = "<Callout>\nUse it like:\n\n```mdx\n</Callout>\n```\n\nafter\n</Callout>\n\nOutro.\n";
        let doc = nodes(src);
        assert_eq!(doc.len(), 2);
        match &doc[0] {
            Node::Structural { tag, children, .. } => {
                assert_eq!(tag, "Callout");
                assert_eq!(children.len(), 3);
                assert_eq!(
                    children[1],
                    Node::CodeBlock {
                        lang: Some("mdx".to_string()),
                        code: "</Callout>\n".to_string(),
                    }
                );
                assert_eq!(
                    children[2],
                    Node::Paragraph {
                        children: vec![Node::text("after")]
                    }
                );
            }
            other => panic!("expected Callout, got {:?}", other),
        }
        assert_eq!(
            doc[1],
            Node::Paragraph {
                children: vec![Node::text("Outro.")]
            }
        );
    }

    #[test]
    fn test_closing_tag_inside_code_span_is_content() {
        let doc = nodes("<Callout>\nClose with `</Callout>` please.\n</Callout>\n");
        assert_eq!(doc.len(), 1);
        match &doc[0] {
            Node::Structural { children, .. } => match &children[0] {
                Node::Paragraph { children } => assert_eq!(
                    children[1],
                    Node::InlineCode {
                        value: "</Callout>".to_string()
                    }
                ),
                other => panic!("expected paragraph, got {:?}", other),
            },
            other => panic!("expected Callout, got {:?}", other),
        }
    }

    #[test]
    fn test_code_spans() {
        assert_eq!(code_spans("a `b` c"), vec![2..5]);
        assert_eq!(code_spans("``x ` y`` z"), vec![0..9]);
        assert!(code_spans("unmatched ` tick").is_empty());
    }

    #[test]
    fn test_unclosed_block_tag_reports_line() {
        let err = compile("Intro\n\n<Callout>\ntext\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("<Callout> is never closed"));
    }

    #[test]
    fn test_unclosed_inline_tag() {
        let err = compile("one\n\ntwo <Highlight>three\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("Highlight"));
    }

    #[test]
    fn test_stray_closing_tag() {
        let err = compile("text\n\n</Callout>\n").unwrap_err();
        assert!(err.message.contains("unexpected closing tag </Callout>"));
    }

    #[test]
    fn test_nested_error_line_is_absolute() {
        let err = compile("a\n\n<Section>\nb\n\n<Prose>\n</Section>\n").unwrap_err();
        assert_eq!(err.line, 6);
    }

    #[test]
    fn test_lowercase_html_passes_through() {
        let doc = nodes("<div class=\"note\">\nraw\n</div>\n");
        assert!(matches!(&doc[0], Node::Html { value } if value.contains("class=\"note\"")));
    }

    #[test]
    fn test_table() {
        let doc = nodes("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        match &doc[0] {
            Node::Table {
                alignments,
                head,
                rows,
            } => {
                assert_eq!(alignments, &vec![Alignment::Left, Alignment::Right]);
                assert_eq!(head.len(), 2);
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0][1], vec![Node::text("2")]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_task_list() {
        let doc = nodes("- [x] done\n- [ ] todo\n");
        match &doc[0] {
            Node::List { items, .. } => {
                assert!(matches!(items[0], Node::ListItem { checked: Some(true), .. }));
                assert!(matches!(items[1], Node::ListItem { checked: Some(false), .. }));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let src = "## 01 Intro\n\n<Callout>\nx\n</Callout>\n";
        assert_eq!(compile(src).unwrap(), compile(src).unwrap());
    }
}
