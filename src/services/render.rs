//! HTML template rendering with component slots.
//!
//! Templates are plain HTML with exactly one root element. A child component
//! is mounted by placing a `<component-NAME></component-NAME>` placeholder in
//! the template and passing the child's rendered element under `NAME`.
//!
//! ```
//! use redbank::dom::Element;
//! use redbank::services::render::render_template;
//!
//! let heading = Element::from_html("<h1>Contacts</h1>").unwrap();
//! let root = render_template(
//!     r#"<section class="contacts"><component-heading></component-heading></section>"#,
//!     &[("heading", heading)],
//! )
//! .unwrap();
//! assert_eq!(root.inner_html(), "<h1>Contacts</h1>");
//! ```

use crate::dom::html::parse_fragment;
use crate::dom::node::Child;
use crate::dom::Element;
use crate::domain::error::{AppError, Result};

/// Parses `template` into its single root element.
///
/// Whitespace around the root is ignored.
///
/// # Errors
///
/// [`AppError::InvalidArgument`] when the template has no root element, more
/// than one, or stray text beside it.
pub fn html_to_element(template: &str) -> Result<Element> {
    let mut root = None;
    for child in parse_fragment(template) {
        match child {
            Child::Element(el) if root.is_none() => root = Some(el),
            Child::Element(_) => {
                return Err(AppError::InvalidArgument(
                    "template must have a single root element".to_string(),
                ))
            }
            Child::Text(text) if text.borrow().trim().is_empty() => {}
            Child::Text(text) => {
                return Err(AppError::InvalidArgument(format!(
                    "unexpected text {:?} outside the template root",
                    text.borrow().trim()
                )))
            }
        }
    }
    root.ok_or_else(|| AppError::InvalidArgument("template has no root element".to_string()))
}

/// Renders `template` and swaps each `<component-NAME>` placeholder for the
/// element supplied under `NAME`.
///
/// # Errors
///
/// [`AppError::NotFound`] when a supplied slot has no placeholder, plus the
/// errors of [`html_to_element`].
pub fn render_template(template: &str, slots: &[(&str, Element)]) -> Result<Element> {
    let root = html_to_element(template)?;
    for (name, component) in slots {
        let tag = format!("component-{name}");
        let placeholder = root
            .query_selector(&tag)?
            .ok_or_else(|| AppError::NotFound(tag.clone()))?;
        placeholder.replace_with(component)?;
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_templates_without_single_root() {
        assert!(matches!(html_to_element("  "), Err(AppError::InvalidArgument(_))));
        assert!(matches!(html_to_element("<a></a><b></b>"), Err(AppError::InvalidArgument(_))));
        assert!(matches!(html_to_element("hi <a></a>"), Err(AppError::InvalidArgument(_))));
        assert_eq!(html_to_element("\n  <p>ok</p>\n").unwrap().tag_name(), "p");
    }

    #[test]
    fn missing_placeholder_is_not_found() {
        let err = render_template("<div></div>", &[("loader", Element::new("div"))]).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref what) if what == "component-loader"));
    }

    #[test]
    fn fills_nested_placeholders() {
        let root = render_template(
            "<div><header><component-a></component-a></header><component-b></component-b></div>",
            &[("a", Element::new("nav")), ("b", Element::new("main"))],
        )
        .unwrap();
        assert_eq!(root.outer_html(), "<div><header><nav></nav></header><main></main></div>");
    }
}
