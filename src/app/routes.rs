//! Route table and view factory contract.
//!
//! Routes map an exact pathname to a [`ViewId`]. The table is an ordered list
//! and the first entry with a matching path wins. Paths with no entry resolve
//! to [`ViewId::NotFound`]; that is a normal outcome, not an error.
//!
//! # Formats
//!
//! JSON:
//!
//! ```json
//! [{ "path": "/", "view": "home" }, { "path": "/about", "view": "about" }]
//! ```
//!
//! TOML:
//!
//! ```toml
//! [[routes]]
//! path = "/"
//! view = "home"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::component::View;
use super::context::AppContext;
use crate::domain::error::{AppError, Result};

/// Identifies a concrete view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    Home,
    About,
    NotFound,
}

/// One path-to-view mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    pub view: ViewId,
}

impl RouteEntry {
    #[must_use]
    pub fn new(path: &str, view: ViewId) -> Self {
        Self {
            path: path.to_string(),
            view,
        }
    }
}

/// Ordered route list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

#[derive(Deserialize)]
struct TomlRoutes {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                RouteEntry::new("/", ViewId::Home),
                RouteEntry::new("/about", ViewId::About),
            ],
        }
    }
}

impl RouteTable {
    /// # Errors
    ///
    /// [`AppError::Config`] when a path does not start with `/`.
    pub fn new(routes: Vec<RouteEntry>) -> Result<Self> {
        if let Some(bad) = routes.iter().find(|route| !route.path.starts_with('/')) {
            return Err(AppError::Config(format!(
                "route path {:?} must start with '/'",
                bad.path
            )));
        }
        let duplicates = routes
            .iter()
            .enumerate()
            .filter(|(idx, route)| routes[..*idx].iter().any(|earlier| earlier.path == route.path));
        for (_, shadowed) in duplicates {
            tracing::warn!(path = %shadowed.path, view = ?shadowed.view, "Route is shadowed by an earlier entry");
        }
        Ok(Self { routes })
    }

    /// A table with no entries; every path resolves to not-found.
    #[must_use]
    pub const fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// # Errors
    ///
    /// [`AppError::Config`] for malformed JSON or invalid paths.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// [`AppError::Config`] for malformed TOML or invalid paths.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let parsed: TomlRoutes = toml::from_str(toml)?;
        Self::new(parsed.routes)
    }

    /// Loads a `.json` or `.toml` route file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// First entry whose path equals `path`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// View for `path`, falling back to [`ViewId::NotFound`].
    #[must_use]
    pub fn resolve(&self, path: &str) -> ViewId {
        self.lookup(path).map_or(ViewId::NotFound, |route| route.view)
    }

    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Builds the view instance for a resolved route.
pub trait ViewFactory {
    /// # Errors
    ///
    /// Returns an error when the view cannot be constructed.
    fn create(&self, view: ViewId, ctx: &AppContext) -> Result<Box<dyn View>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_routes_home_and_about() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/"), ViewId::Home);
        assert_eq!(table.resolve("/about"), ViewId::About);
        assert_eq!(table.resolve("/about/"), ViewId::NotFound);
    }

    #[test]
    fn first_duplicate_wins() {
        let table = RouteTable::from_json(
            r#"[{"path":"/x","view":"about"},{"path":"/x","view":"home"}]"#,
        )
        .unwrap();
        assert_eq!(table.resolve("/x"), ViewId::About);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn loads_toml_and_rejects_relative_paths() {
        let table = RouteTable::from_toml(
            "[[routes]]\npath = \"/\"\nview = \"home\"\n\n[[routes]]\npath = \"/help\"\nview = \"not-found\"\n",
        )
        .unwrap();
        assert_eq!(table.resolve("/help"), ViewId::NotFound);

        let err = RouteTable::from_json(r#"[{"path":"about","view":"about"}]"#).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(matches!(RouteTable::from_json("{"), Err(AppError::Config(_))));
    }

    #[test]
    fn route_files_are_read_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        std::fs::write(&path, "[[routes]]\npath = \"/about\"\nview = \"about\"\n").unwrap();
        let table = RouteTable::from_file(&path).unwrap();
        assert_eq!(table.entries(), &[RouteEntry::new("/about", ViewId::About)]);
        assert!(RouteTable::empty().is_empty());
    }
}
