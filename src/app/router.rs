//! History-based router.
//!
//! The router owns the active view and the layout shell. It listens for
//! `popstate` on the window and for delegated anchor clicks on the document,
//! resolves the current pathname against the [`RouteTable`], builds the view
//! through the [`ViewFactory`] and swaps it into the layout's content slot.
//!
//! # Resolution
//!
//! ```text
//! location ──▶ RouteTable::resolve ──▶ ViewFactory::create ──▶ View::render
//!                                                                  │
//!        ┌──────────── old view teardown ◀─────────────────────────┘
//!        ▼
//!  first time: Layout::render around the element, mounted into #app
//!  afterwards: .content cleared, element appended
//! ```
//!
//! Errors raised inside listeners have nowhere to go, so they are logged with
//! `tracing::error!`. Errors from [`Router::start`] and [`Router::navigate`]
//! are returned to the caller.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::component::View;
use super::context::AppContext;
use super::routes::{RouteTable, ViewFactory, ViewId};
use crate::browser::WindowListener;
use crate::dom::{Element, Event, Listener, ListenerId};
use crate::domain::error::{AppError, Result};
use crate::query::Query;
use crate::ui::layout::Layout;

/// Selector of the element the layout is mounted into.
pub const MOUNT_POINT: &str = "#app";

#[derive(Default)]
struct RouterState {
    active: Option<Box<dyn View>>,
    layout: Option<Layout>,
    current_view: Option<ViewId>,
    resolutions: usize,
}

struct RouterInner {
    ctx: AppContext,
    routes: RouteTable,
    factory: Box<dyn ViewFactory>,
    state: RefCell<RouterState>,
    popstate: RefCell<Option<ListenerId>>,
    click: RefCell<Option<ListenerId>>,
}

impl RouterInner {
    fn resolve(&self) -> Result<()> {
        let path = self.ctx.window.location();
        let view_id = self.routes.resolve(&path);
        let _span = tracing::debug_span!("resolve", path = %path, view = ?view_id).entered();

        let mut view = self.factory.create(view_id, &self.ctx)?;
        let element = view.render()?;

        let previous = self.state.borrow_mut().active.take();
        if let Some(mut previous) = previous {
            previous.teardown();
        }

        let has_layout = self.state.borrow().layout.is_some();
        if has_layout {
            let slot = self.content_slot()?;
            slot.clear_children();
            slot.append_child(&element)?;
        } else {
            let mount = Query::select(self.ctx.document(), MOUNT_POINT)?;
            let mut layout = Layout::new(&self.ctx);
            let root = layout.render(&element)?;
            mount.element().clear_children();
            mount.append(&root)?;
            self.state.borrow_mut().layout = Some(layout);
            tracing::debug!("Layout mounted");
        }

        let mut state = self.state.borrow_mut();
        state.active = Some(view);
        state.current_view = Some(view_id);
        state.resolutions += 1;
        tracing::info!(path = %path, view = ?view_id, "Route resolved");
        Ok(())
    }

    fn content_slot(&self) -> Result<Element> {
        self.state
            .borrow()
            .layout
            .as_ref()
            .and_then(Layout::content_slot)
            .ok_or_else(|| AppError::NotFound(".content".to_string()))
    }

    fn navigate(&self, path: &str) -> Result<bool> {
        let target = self.ctx.window.resolve(path);
        if target == self.ctx.window.location() {
            tracing::trace!(path = %target, "Already at path");
            return Ok(false);
        }
        self.ctx.window.push_state(&target);
        self.resolve()?;
        Ok(true)
    }
}

impl Drop for RouterInner {
    fn drop(&mut self) {
        if let Some(id) = self.popstate.get_mut().take() {
            self.ctx.window.remove_event_listener(id);
        }
        if let Some(id) = self.click.get_mut().take() {
            self.ctx.document().remove_event_listener(id);
        }
        let state = self.state.get_mut();
        if let Some(mut view) = state.active.take() {
            view.teardown();
        }
        if let Some(layout) = state.layout.as_mut() {
            layout.teardown();
        }
    }
}

/// Shared handle to the running router.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("path", &self.current_path())
            .field("view", &self.current_view())
            .field("routes", &self.inner.routes.len())
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Installs the listeners and renders the current location.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the document has no `#app` mount point,
    /// or any error from building or rendering the initial view.
    pub fn start(
        ctx: AppContext,
        routes: RouteTable,
        factory: Box<dyn ViewFactory>,
    ) -> Result<Self> {
        let _span = tracing::info_span!("router_start", routes = routes.len()).entered();
        Query::select(ctx.document(), MOUNT_POINT)?;

        let inner = Rc::new(RouterInner {
            ctx,
            routes,
            factory,
            state: RefCell::new(RouterState::default()),
            popstate: RefCell::new(None),
            click: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let on_popstate: WindowListener = Rc::new(move |path: &str| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            tracing::debug!(path, "popstate");
            if let Err(err) = inner.resolve() {
                tracing::error!(error = %err, path, "Failed to render route");
            }
        });
        let id = inner.ctx.window.add_event_listener("popstate", on_popstate);
        *inner.popstate.borrow_mut() = Some(id);

        inner.resolve()?;

        let weak: Weak<RouterInner> = Rc::downgrade(&inner);
        let on_click: Listener = Rc::new(move |event: &Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let anchor = match event.target().closest("a") {
                Ok(Some(anchor)) => anchor,
                Ok(None) => return,
                Err(err) => {
                    tracing::error!(error = %err, "Anchor lookup failed");
                    return;
                }
            };
            event.prevent_default();
            let Some(href) = anchor.attribute("href") else {
                return;
            };
            let path = inner.ctx.window.resolve(&href);
            if let Err(err) = inner.navigate(&path) {
                tracing::error!(error = %err, path = %path, "Navigation failed");
            }
        });
        let id = inner.ctx.document().add_event_listener("click", on_click);
        *inner.click.borrow_mut() = Some(id);

        Ok(Self { inner })
    }

    /// Pushes `path` and renders it. Navigating to the current path is a
    /// no-op and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns any error from building or rendering the view.
    pub fn navigate(&self, path: &str) -> Result<bool> {
        self.inner.navigate(path)
    }

    #[must_use]
    pub fn current_path(&self) -> String {
        self.inner.ctx.window.location()
    }

    #[must_use]
    pub fn current_view(&self) -> Option<ViewId> {
        self.inner.state.borrow().current_view
    }

    /// Number of completed resolutions since start.
    #[must_use]
    pub fn resolutions(&self) -> usize {
        self.inner.state.borrow().resolutions
    }

    /// Root of the mounted layout shell.
    #[must_use]
    pub fn layout_element(&self) -> Option<Element> {
        self.inner
            .state
            .borrow()
            .layout
            .as_ref()
            .and_then(|layout| layout.element().cloned())
    }

    /// Element that holds the active view.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] before the layout is mounted.
    pub fn content_slot(&self) -> Result<Element> {
        self.inner.content_slot()
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.inner.ctx
    }
}
