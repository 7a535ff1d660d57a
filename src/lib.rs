//! Red Bank: a headless single-page banking client core.
//!
//! The crate models a small banking web app without a browser:
//! - History-based routing with a not-found fallback
//! - A persistent layout shell whose content region is swapped on navigation
//! - A typed signal bus that lets screens refresh each other
//! - A chainable element query layer every component is built on
//! - An in-memory bank answering on a virtual timer queue
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Demo runner (main.rs)                              │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Routing
//! │  - Router and route table                           │  ← View lifecycle
//! │  - View/Screen contracts, AppContext                │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Screens / UI  │   │ Services      │   │ API           │
//! │ (screens/,ui/)│   │ (services/)   │   │ (api/)        │
//! │ - Home, About │   │ - Signal bus  │   │ - Traits      │
//! │ - Layout      │   │ - Banner      │   │ - MemoryBank  │
//! │ - Components  │   │ - Templates   │   │ - Cancellation│
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Query layer (query) over the headless DOM (dom/)   │
//! │  Browser substrate: window, history, timers         │
//! │  Domain models and errors (domain/), utils/         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber, OpenTelemetry file export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Router, route table, view lifecycle and application context
//! - [`api`]: Collaborator service traits and the in-memory bank
//! - [`browser`]: Window, location, history and the virtual timer queue
//! - [`dom`]: Headless element tree, selectors and HTML fragments
//! - [`domain`]: Banking models and errors
//! - [`query`]: Chainable element query handle
//! - [`screens`]: Home, About and Not found screens
//! - [`services`]: Signal bus, notification banner, templates, validation
//! - [`ui`]: Layout shell and reusable components
//! - [`utils`]: Formatting and debouncing
//! - [`infrastructure`]: Home-relative path expansion
//! - [`observability`]: Tracing setup and trace export
//!
//! # Configuration
//!
//! Settings come from a TOML file or a flat key/value map:
//!
//! ```toml
//! app_title = "Red Bank"
//! notification_delay_ms = 5000
//! render_delay_ms = 500
//! search_debounce_ms = 300
//! api_latency_ms = 150
//! trace_level = "debug"
//! bank_file = "~/.redbank/bank.json"
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use redbank::{initialize, Config};
//! use redbank::app::ViewId;
//!
//! let app = initialize(Config::default(), "/").unwrap();
//! assert_eq!(app.router().current_view(), Some(ViewId::Home));
//!
//! app.router().navigate("/about").unwrap();
//! assert_eq!(app.document().title(), "About | Red Bank");
//!
//! app.scheduler().advance(Duration::from_secs(1));
//! # Ok::<(), redbank::AppError>(())
//! ```

pub mod api;
pub mod app;
pub mod browser;
pub mod dom;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod query;
pub mod screens;
pub mod services;
pub mod ui;
pub mod utils;

pub use app::{AppContext, RouteTable, Router, ViewId};
pub use domain::{AppError, Result};

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use api::MemoryBank;
use app::{Services, Session};
use browser::{Scheduler, Window};
use dom::Document;
use infrastructure::expand_tilde;
use screens::ScreenFactory;

/// Application settings.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Suffix of every document title. Default: `"Red Bank"`
    pub app_title: String,

    /// How long a notification stays visible. Default: 5000
    pub notification_delay_ms: u64,

    /// Delay before data-fetching components start loading. Default: 500
    pub render_delay_ms: u64,

    /// Quiet period before the header search runs. Default: 300
    pub search_debounce_ms: u64,

    /// How long an invalid field stays highlighted. Default: 2000
    pub validation_error_ms: u64,

    /// Simulated round trip of the in-memory bank. Default: 150
    pub api_latency_ms: u64,

    /// Tracing filter. Options: `trace`, `debug`, `info`, `warn`, `error`.
    /// Default: `"info"`
    pub trace_level: Option<String>,

    /// Export spans as JSON lines to this file instead of logging to stderr.
    pub trace_file: Option<String>,

    /// Persist the bank to this JSON file. Without it the seeded data lives
    /// in memory only.
    pub bank_file: Option<String>,

    /// Route table file (`.json` or `.toml`). Default: `/` and `/about`.
    pub routes_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_title: "Red Bank".to_string(),
            notification_delay_ms: 5000,
            render_delay_ms: 500,
            search_debounce_ms: 300,
            validation_error_ms: 2000,
            api_latency_ms: 150,
            trace_level: None,
            trace_file: None,
            bank_file: None,
            routes_file: None,
        }
    }
}

impl Config {
    /// Parses settings from a flat string map.
    ///
    /// Missing keys and numbers that fail to parse keep their defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use redbank::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("render_delay_ms".to_string(), "0".to_string());
    /// map.insert("api_latency_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.render_delay_ms, 0);
    /// assert_eq!(config.api_latency_ms, 150);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: u64| {
            map.get(key).map_or(default, |raw| {
                raw.trim().parse::<u64>().unwrap_or_else(|_| {
                    tracing::debug!(key, value = %raw, "invalid number, using default");
                    default
                })
            })
        };
        let text = |key: &str| {
            map.get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            app_title: text("app_title").unwrap_or(defaults.app_title),
            notification_delay_ms: millis("notification_delay_ms", defaults.notification_delay_ms),
            render_delay_ms: millis("render_delay_ms", defaults.render_delay_ms),
            search_debounce_ms: millis("search_debounce_ms", defaults.search_debounce_ms),
            validation_error_ms: millis("validation_error_ms", defaults.validation_error_ms),
            api_latency_ms: millis("api_latency_ms", defaults.api_latency_ms),
            trace_level: text("trace_level"),
            trace_file: text("trace_file"),
            bank_file: text("bank_file"),
            routes_file: text("routes_file"),
        }
    }

    /// # Errors
    ///
    /// [`AppError::Config`] for malformed TOML, wrongly typed values or a
    /// failed [`Config::validate`].
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "Loading config");
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// # Errors
    ///
    /// [`AppError::Config`] for an empty title or a zero notification delay.
    pub fn validate(&self) -> Result<()> {
        if self.app_title.trim().is_empty() {
            return Err(AppError::Config("app_title must not be empty".to_string()));
        }
        if self.notification_delay_ms == 0 {
            return Err(AppError::Config(
                "notification_delay_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn notification_delay(&self) -> Duration {
        Duration::from_millis(self.notification_delay_ms)
    }

    #[must_use]
    pub const fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub const fn validation_error_duration(&self) -> Duration {
        Duration::from_millis(self.validation_error_ms)
    }

    #[must_use]
    pub const fn api_latency(&self) -> Duration {
        Duration::from_millis(self.api_latency_ms)
    }
}

/// A running application: router, window and bank.
pub struct App {
    router: Router,
    bank: Rc<MemoryBank>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("router", &self.router)
            .field("bank", &self.bank)
            .finish()
    }
}

impl App {
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.router.context().window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.router.context().document()
    }

    #[must_use]
    pub fn scheduler(&self) -> Rc<Scheduler> {
        self.router.context().scheduler()
    }

    /// Runs every pending timer, including ones scheduled along the way.
    pub fn settle(&self) -> usize {
        self.scheduler().run_until_idle()
    }
}

/// Boots the app at `path` with the bundled screens.
///
/// The bank is loaded from `bank_file` when set, otherwise seeded in memory.
/// The session is whoever the bank has signed in.
///
/// # Errors
///
/// Returns an error for an invalid config, an unreadable bank or route file,
/// or a failed initial render.
pub fn initialize(config: Config, path: &str) -> Result<App> {
    let _span = tracing::info_span!("initialize", path).entered();
    config.validate()?;

    let window = Window::new(path);
    let bank = match &config.bank_file {
        Some(file) => MemoryBank::open(expand_tilde(file), window.scheduler(), config.api_latency())?,
        None => MemoryBank::seeded(window.scheduler(), config.api_latency())?,
    };
    let bank = Rc::new(bank);

    let routes = match &config.routes_file {
        Some(file) => RouteTable::from_file(expand_tilde(file))?,
        None => RouteTable::default(),
    };

    let session = Session::new(bank.session_user());
    tracing::debug!(user = ?session.user().map(|user| user.id), "Session loaded");
    let ctx = AppContext::new(window, config, session, Services::from_bank(&bank));
    let router = Router::start(ctx, routes, Box::new(ScreenFactory))?;
    Ok(App { router, bank })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_only_listed_fields() {
        let config = Config::from_toml_str("render_delay_ms = 0\ntrace_level = \"debug\"\n").unwrap();
        assert_eq!(config.render_delay_ms, 0);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.notification_delay_ms, 5000);
        assert_eq!(config.app_title, "Red Bank");
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("notification_delay_ms = 0"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("render_delay_ms = \"soon\""),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redbank.toml");
        std::fs::write(&path, "app_title = \"Blue Bank\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.app_title, "Blue Bank");
        assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn map_blanks_keep_defaults() {
        let mut map = BTreeMap::new();
        map.insert("app_title".to_string(), "  ".to_string());
        map.insert("trace_file".to_string(), "/tmp/t.jsonl".to_string());
        let config = Config::from_map(&map);
        assert_eq!(config.app_title, "Red Bank");
        assert_eq!(config.trace_file.as_deref(), Some("/tmp/t.jsonl"));
    }
}
