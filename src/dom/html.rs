//! Lenient HTML fragment parsing and serialization.
//!
//! The parser accepts the markup components produce: nested elements,
//! quoted or bare attribute values, void and self-closing tags, character
//! references and comments. Mismatched closing tags are ignored rather than
//! rejected.

use std::cell::RefCell;
use std::rc::Rc;

use super::node::{Child, Element};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parses `markup` into detached top-level nodes.
pub(crate) fn parse_fragment(markup: &str) -> Vec<Child> {
    let container = Element::new("template");
    let mut stack = vec![container.clone()];
    let mut rest = markup;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            push_text(&stack, rest);
            break;
        };
        if lt > 0 {
            push_text(&stack, &rest[..lt]);
            rest = &rest[lt..];
        }

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
        } else if rest.starts_with("<!") {
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            if let Some(depth) = stack.iter().skip(1).rposition(|el| el.tag_name() == name) {
                stack.truncate(depth + 1);
            }
            rest = after.get(end + 1..).unwrap_or("");
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (tag, consumed) = parse_open_tag(&rest[1..]);
            rest = &rest[1 + consumed..];
            let element = Element::new(&tag.name);
            for (name, value) in &tag.attributes {
                element.set_attribute(name, value);
            }
            if let Some(parent) = stack.last() {
                parent.push_child(Child::Element(element.clone()));
            }
            if !tag.self_closing && !is_void(element.tag_name()) {
                stack.push(element);
            }
        } else {
            push_text(&stack, "<");
            rest = &rest[1..];
        }
    }

    let children = container.child_nodes();
    container.clear_children();
    children
}

fn push_text(stack: &[Element], raw: &str) {
    if raw.is_empty() {
        return;
    }
    let Some(parent) = stack.last() else {
        return;
    };
    let text = decode_entities(raw);
    if let Some(Child::Text(last)) = parent.child_nodes().last() {
        last.borrow_mut().push_str(&text);
        return;
    }
    parent.push_child(Child::Text(Rc::new(RefCell::new(text))));
}

struct OpenTag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

/// Parses the inside of an opening tag (after `<`). Returns the tag and the
/// number of bytes consumed, including the closing `>`.
fn parse_open_tag(input: &str) -> (OpenTag, usize) {
    let bytes = input.as_bytes();
    let mut pos = 0;
    let is_name = |b: u8| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':';

    while pos < bytes.len() && is_name(bytes[pos]) {
        pos += 1;
    }
    let mut tag = OpenTag {
        name: input[..pos].to_ascii_lowercase(),
        attributes: Vec::new(),
        self_closing: false,
    };

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos) {
            None => return (tag, pos),
            Some(b'>') => return (tag, pos + 1),
            Some(b'/') => {
                tag.self_closing = true;
                pos += 1;
                continue;
            }
            Some(_) => {}
        }

        let start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let name = input[start..pos].to_ascii_lowercase();
        tag.self_closing = false;

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let open = pos + 1;
                    let close = input[open..]
                        .find(quote as char)
                        .map_or(input.len(), |offset| open + offset);
                    value = decode_entities(&input[open..close]);
                    pos = (close + 1).min(input.len());
                }
                _ => {
                    let open = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    value = decode_entities(&input[open..pos]);
                }
            }
        }
        if !name.is_empty() && !tag.attributes.iter().any(|(existing, _)| *existing == name) {
            tag.attributes.push((name, value));
        }
    }
}

/// Decodes the character references used in practice.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((ch, end + 1))
        });
        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escapes text for use in element content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

pub(crate) fn serialize_element(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

pub(crate) fn serialize_children(el: &Element) -> String {
    let mut out = String::new();
    for child in el.child_nodes() {
        write_child(&child, &mut out);
    }
    out
}

fn write_child(child: &Child, out: &mut String) {
    match child {
        Child::Text(text) => out.push_str(&escape_text(&text.borrow())),
        Child::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(el.tag_name());
    for (name, value) in el.attributes() {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&value));
        out.push('"');
    }
    out.push('>');
    if is_void(el.tag_name()) {
        return;
    }
    for child in el.child_nodes() {
        write_child(&child, out);
    }
    out.push_str("</");
    out.push_str(el.tag_name());
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_markup_with_void_elements() {
        let el = Element::from_html(
            r#"<form class="field"><input type="number" name="amount" placeholder="0"/><button type="submit">Send &amp; go</button></form>"#,
        )
        .unwrap();
        assert_eq!(el.tag_name(), "form");
        let children = el.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attribute("placeholder").as_deref(), Some("0"));
        assert_eq!(children[1].text_content(), "Send & go");
    }

    #[test]
    fn serialization_reescapes_content() {
        let el = Element::from_html(r#"<p title='a "b"'>1 &lt; 2<br></p>"#).unwrap();
        assert_eq!(el.outer_html(), r#"<p title="a &quot;b&quot;">1 &lt; 2<br></p>"#);
    }

    #[test]
    fn tolerates_stray_and_unclosed_tags() {
        let el = Element::from_html("<div><span>open</div></em>after").unwrap();
        assert_eq!(el.inner_html(), "<span>open</span>");
        let nodes = parse_fragment("<!-- note --><b>x</b> a < b");
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn component_placeholders_parse_as_elements() {
        let el = Element::from_html("<div><component-heading></component-heading></div>").unwrap();
        assert!(el.query_selector("component-heading").unwrap().is_some());
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("&#36;5 &#x41; &bogus; &"), "$5 A &bogus; &");
    }
}
