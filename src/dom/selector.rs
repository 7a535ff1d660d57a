//! A small CSS selector engine.
//!
//! Supported syntax: type selectors, `*`, `#id`, `.class`, `[attr]`,
//! `[attr=value]` (quoted or bare), the descendant and `>` combinators, and
//! comma-separated groups. Matching is evaluated against the whole tree the
//! element lives in, so `div > p` matches a `<p>` whose parent is a `<div>`
//! even when the query starts below that `<div>`.

use super::node::Element;
use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
    }

    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && tag != el.tag_name() {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| el.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| match expected {
            None => el.has_attribute(name),
            Some(value) => el.attribute(name).as_deref() == Some(value.as_str()),
        })
    }
}

/// One comma-free selector, stored left to right. The combinator of each part
/// links it to the part before it; the first part's combinator is unused.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches_at(&self, idx: usize, el: &Element) -> bool {
        let (combinator, compound) = &self.parts[idx];
        if !compound.matches(el) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => el
                .parent()
                .is_some_and(|parent| self.matches_at(idx - 1, &parent)),
            Combinator::Descendant => {
                let mut ancestor = el.parent();
                while let Some(candidate) = ancestor {
                    if self.matches_at(idx - 1, &candidate) {
                        return true;
                    }
                    ancestor = candidate.parent();
                }
                false
            }
        }
    }
}

/// A parsed selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parses a selector group.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] when the input is empty or uses
    /// unsupported syntax.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser {
            source: input,
            chars: input.chars().collect(),
            pos: 0,
        };
        let alternatives = parser.group()?;
        Ok(Self { alternatives })
    }

    #[must_use]
    pub fn matches(&self, el: &Element) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches_at(complex.parts.len() - 1, el))
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, detail: &str) -> AppError {
        AppError::InvalidArgument(format!("invalid selector {:?}: {detail}", self.source))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn group(&mut self) -> Result<Vec<Complex>> {
        let mut alternatives = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            alternatives.push(self.complex()?);
        }
        if self.pos != self.chars.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(alternatives)
    }

    fn complex(&mut self) -> Result<Complex> {
        self.skip_whitespace();
        let mut parts = vec![(Combinator::Descendant, self.compound()?)];
        loop {
            let spaced = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if spaced => Combinator::Descendant,
                Some(c) => return Err(self.error(&format!("unexpected {c:?}"))),
            };
            parts.push((combinator, self.compound()?));
        }
        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(char::is_alphabetic) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if compound.is_empty() {
            return Err(self.error("expected a simple selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<(String, Option<String>)> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.attribute_value()?)
            }
            _ => return Err(self.error("malformed attribute selector")),
        };
        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        self.pos += 1;
        Ok((name, value))
    }

    fn attribute_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated string"));
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Element {
        Element::from_html(
            r#"<div class="layout"><header class="header"><a href="/">Logo</a></header><main class="main"><div class="content"><input name="card-number" type="text"><p>x</p></div></main></div>"#,
        )
        .unwrap()
    }

    #[test]
    fn compound_selectors_match() {
        let root = doc();
        let input = root.query_selector("input[name=\"card-number\"]").unwrap().unwrap();
        assert_eq!(input.attribute("type").as_deref(), Some("text"));
        assert!(input.matches("input[type=text]").unwrap());
        assert!(input.matches("[name]").unwrap());
        assert!(!input.matches("input[type=number]").unwrap());
        assert!(root.matches("div.layout").unwrap());
        assert!(root.matches("*").unwrap());
    }

    #[test]
    fn combinators_walk_ancestors() {
        let root = doc();
        assert!(root.query_selector(".main > .content").unwrap().is_some());
        assert!(root.query_selector(".layout > .content").unwrap().is_none());
        assert!(root.query_selector(".layout .content p").unwrap().is_some());
        let hits = root.query_selector_all("a, p").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].tag_name(), "a");
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        for bad in ["", "  ", "div >", ".", "[name", "a,,b", "#"] {
            assert!(Selector::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }
}
