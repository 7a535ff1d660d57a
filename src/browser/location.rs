//! Pathname handling for link targets.

/// Resolves a link `href` against the current `base` pathname.
///
/// Absolute URLs are reduced to their path, root-relative paths are kept and
/// relative paths are resolved against the directory of `base`. Query strings
/// and fragments are dropped because routes match on pathname only. An empty
/// result (`""`, `"#top"`, `"?q=1"`) stays on `base`.
///
/// ```
/// use redbank::browser::resolve_href;
///
/// assert_eq!(resolve_href("/", "http://localhost:5173/about"), "/about");
/// assert_eq!(resolve_href("/cards/list", "../about?x=1#y"), "/about");
/// ```
#[must_use]
pub fn resolve_href(base: &str, href: &str) -> String {
    let href = href.trim();
    let href = href.split_once('#').map_or(href, |(path, _)| path);
    let href = href.split_once('?').map_or(href, |(path, _)| path);

    let joined = if let Some(rest) = strip_scheme(href) {
        match rest.find('/') {
            Some(slash) => rest[slash..].to_string(),
            None => "/".to_string(),
        }
    } else if href.starts_with('/') {
        href.to_string()
    } else if href.is_empty() {
        base.to_string()
    } else {
        let directory = base.rfind('/').map_or("/", |slash| &base[..=slash]);
        format!("{directory}{href}")
    };

    normalize(&joined)
}

fn strip_scheme(href: &str) -> Option<&str> {
    if let Some(rest) = href.strip_prefix("//") {
        return Some(rest);
    }
    let (scheme, rest) = href.split_once("://")?;
    scheme
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(rest)
}

/// Collapses `.` and `..` segments and duplicate slashes.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let trailing = path.len() > 1 && (path.ends_with('/') || path.ends_with("/.") || path.ends_with("/.."));
    let mut out = format!("/{}", segments.join("/"));
    if trailing && out != "/" {
        out.push('/');
    }
    out
}
