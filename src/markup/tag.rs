//! Parsing of JSX-style structural tags: `<Name prop="x" other={1} />`

use super::node::{PropValue, Props};

/// An opening structural tag
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTag {
    pub name: String,
    pub props: Props,
    pub self_closing: bool,
    /// Byte offset just past the closing `>`
    pub end: usize,
}

/// Whether text starts with `<` followed by an uppercase letter
pub fn is_structural_open(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Whether text starts with `</` followed by an uppercase letter
pub fn is_structural_close(text: &str) -> bool {
    text.strip_prefix("</")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Parse a closing tag `</Name>` at the start of `text`.
/// Returns the name and the byte length consumed.
pub fn parse_close_tag(text: &str) -> Option<(&str, usize)> {
    let rest = text.strip_prefix("</")?;
    let name_len = rest
        .find(|c: char| !is_name_char(c))
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    let after = &rest[name_len..];
    let trimmed = after.trim_start();
    if name.is_empty() || !trimmed.starts_with('>') {
        return None;
    }
    let consumed = 2 + name_len + (after.len() - trimmed.len()) + 1;
    Some((name, consumed))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

/// Parse an opening tag starting at byte `start` of `src`
pub fn parse_open_tag(src: &str, start: usize) -> Result<OpenTag, String> {
    let mut cursor = Cursor { src, pos: start };
    if !cursor.eat("<") {
        return Err("expected `<`".to_string());
    }
    let name = cursor.take_while(is_name_char).to_string();
    if name.is_empty() {
        return Err("missing tag name".to_string());
    }

    let mut props = Props::new();
    loop {
        cursor.skip_whitespace();
        if cursor.eat("/>") {
            return Ok(OpenTag {
                name,
                props,
                self_closing: true,
                end: cursor.pos,
            });
        }
        if cursor.eat(">") {
            return Ok(OpenTag {
                name,
                props,
                self_closing: false,
                end: cursor.pos,
            });
        }
        if cursor.is_eof() {
            return Err(format!("unterminated tag <{}>", name));
        }

        let attr = cursor
            .take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ':')
            .to_string();
        if attr.is_empty() {
            return Err(format!(
                "unexpected {:?} in tag <{}>",
                cursor.peek().unwrap_or(' '),
                name
            ));
        }

        cursor.skip_whitespace();
        let value = if cursor.eat("=") {
            cursor.skip_whitespace();
            match cursor.peek() {
                Some(q @ ('"' | '\'')) => PropValue::String(cursor.quoted(q)?),
                Some('{') => {
                    let expr = cursor.braced()?;
                    parse_expression(expr.trim())
                        .map_err(|e| format!("prop `{}` of <{}>: {}", attr, name, e))?
                }
                _ => return Err(format!("prop `{}` of <{}> has no value", attr, name)),
            }
        } else {
            PropValue::Bool(true)
        };
        props.insert(attr, value);
    }
}

/// Parse the literal inside `{…}`: numbers, booleans, strings and arrays
pub fn parse_expression(expr: &str) -> Result<PropValue, String> {
    match expr {
        "true" => return Ok(PropValue::Bool(true)),
        "false" => return Ok(PropValue::Bool(false)),
        _ => {}
    }
    if let Ok(n) = expr.parse::<f64>() {
        if !n.is_finite() {
            return Err(format!("number {{{}}} is not finite", expr));
        }
        return Ok(PropValue::Number(n));
    }
    if let Some(q) = expr
        .chars()
        .next()
        .filter(|c| matches!(c, '"' | '\'' | '`'))
    {
        let mut cursor = Cursor { src: expr, pos: 0 };
        let s = cursor.quoted(q)?;
        if !cursor.is_eof() {
            return Err(format!("unexpected text after string in {{{}}}", expr));
        }
        return Ok(PropValue::String(s));
    }
    if let Some(inner) = expr.strip_prefix('[').and_then(|e| e.strip_suffix(']')) {
        return split_top_level(inner)
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| parse_expression(item.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(PropValue::List);
    }
    Err(format!("unsupported expression {{{}}}", expr))
}

/// Split on commas that are not nested in quotes or brackets
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut last = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(c),
            (None, '[' | '{') => depth += 1,
            (None, ']' | '}') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&s[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[last..]);
    parts
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// A string delimited by `quote`, with backslash escapes
    fn quoted(&mut self, quote: char) -> Result<String, String> {
        self.pos += quote.len_utf8();
        let mut out = String::new();
        let mut escaped = false;
        for (i, c) in self.rest().char_indices() {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                self.pos += i + c.len_utf8();
                return Ok(out);
            } else {
                out.push(c);
            }
        }
        Err("unterminated string".to_string())
    }

    /// The text between a `{` and its matching `}`
    fn braced(&mut self) -> Result<&'a str, String> {
        let rest = self.rest();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        for (i, c) in rest.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'' | '`') => quote = Some(c),
                (None, '{') => depth += 1,
                (None, '}') => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += i + 1;
                        return Ok(&rest[1..i]);
                    }
                }
                _ => {}
            }
        }
        Err("unterminated `{` expression".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_structural_tags() {
        assert!(is_structural_open("<Callout title=\"x\">"));
        assert!(!is_structural_open("<div>"));
        assert!(!is_structural_open("</Callout>"));
        assert!(is_structural_close("</Callout>"));
        assert!(!is_structural_close("</div>"));
    }

    #[test]
    fn test_parse_open_tag_with_props() {
        let src = r#"<StatCard label="Load time" value='1.2s' delay={0.2} trend="up" highlighted />"#;
        let tag = parse_open_tag(src, 0).unwrap();
        assert_eq!(tag.name, "StatCard");
        assert!(tag.self_closing);
        assert_eq!(tag.end, src.len());
        assert_eq!(tag.props["label"], PropValue::String("Load time".to_string()));
        assert_eq!(tag.props["value"], PropValue::String("1.2s".to_string()));
        assert_eq!(tag.props["delay"], PropValue::Number(0.2));
        assert_eq!(tag.props["highlighted"], PropValue::Bool(true));
        let order: Vec<_> = tag.props.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["label", "value", "delay", "trend", "highlighted"]);
    }

    #[test]
    fn test_multiline_tag() {
        let src = "<FeatureCard\n  icon=\"zap\"\n  title=\"Fast\"\n>\nrest";
        let tag = parse_open_tag(src, 0).unwrap();
        assert!(!tag.self_closing);
        assert_eq!(&src[tag.end..], "\nrest");
        assert_eq!(tag.props.len(), 2);
    }

    #[test]
    fn test_array_expression() {
        let value = parse_expression(r#"["Next.js 16", 'Bun', 3]"#).unwrap();
        assert_eq!(
            value,
            PropValue::List(vec![
                PropValue::String("Next.js 16".to_string()),
                PropValue::String("Bun".to_string()),
                PropValue::Number(3.0),
            ])
        );
    }

    #[test]
    fn test_rejects_unsupported_expressions() {
        assert!(parse_expression("someVariable").is_err());
        assert!(parse_open_tag("<Chart data={items.map(f)} />", 0).is_err());
        assert!(parse_open_tag("<Callout title=\"x\"", 0)
            .unwrap_err()
            .contains("unterminated"));
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        assert_eq!(parse_expression("2.5").unwrap(), PropValue::Number(2.5));
        for expr in ["NaN", "inf", "-infinity"] {
            assert!(parse_expression(expr).unwrap_err().contains("not finite"));
        }
        assert!(parse_open_tag("<StatCard label=\"a\" value={NaN} />", 0).is_err());
    }

    #[test]
    fn test_brace_string_with_braces_inside() {
        let tag = parse_open_tag(r#"<Callout title={"a } b"}>"#, 0).unwrap();
        assert_eq!(tag.props["title"], PropValue::String("a } b".to_string()));
    }

    #[test]
    fn test_parse_close_tag() {
        assert_eq!(parse_close_tag("</Callout>\nmore"), Some(("Callout", 10)));
        assert_eq!(parse_close_tag("</Callout >"), Some(("Callout", 11)));
        assert_eq!(parse_close_tag("</Callout"), None);
    }
}
