//! Page routing: location → page kind → view controller.

pub mod shell;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::client::Backend;
use crate::views::{
    AgentsTable, AlertsList, DetectionsFeed, ViewContext, ViewController, ViewHandle,
};

/// Logical identity of the page being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Dashboard,
    Agents,
    Alerts,
    Other,
}

impl PageKind {
    /// Resolve a location path. Query strings and fragments are ignored.
    pub fn resolve(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        if path == "/" || path.contains("index.html") {
            Self::Dashboard
        } else if path.contains("agents.html") {
            Self::Agents
        } else if path.contains("alerts.html") {
            Self::Alerts
        } else {
            Self::Other
        }
    }
}

/// Class list of one optional layout element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    classes: BTreeSet<String>,
}

impl Panel {
    pub fn toggle(&mut self, class: &str) {
        if !self.classes.remove(class) {
            self.classes.insert(class.to_string());
        }
    }

    pub fn has(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Layout elements around the page content. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageChrome {
    pub sidebar_toggle: bool,
    pub sidebar: Option<Panel>,
    pub wrapper: Option<Panel>,
    pub main_content: Option<Panel>,
    toggle_wired: bool,
}

impl PageChrome {
    /// Chrome of the standard console layout: every element present.
    pub fn standard() -> Self {
        Self {
            sidebar_toggle: true,
            sidebar: Some(Panel::default()),
            wrapper: Some(Panel::default()),
            main_content: Some(Panel::default()),
            toggle_wired: false,
        }
    }

    /// Wire the sidebar toggle if the toggle, sidebar and wrapper exist.
    pub fn wire_sidebar_toggle(&mut self) -> bool {
        self.toggle_wired = self.sidebar_toggle && self.sidebar.is_some() && self.wrapper.is_some();
        self.toggle_wired
    }

    pub fn is_toggle_wired(&self) -> bool {
        self.toggle_wired
    }

    /// Click on the sidebar toggle. No-op when the toggle is not wired.
    pub fn click_sidebar_toggle(&mut self) {
        if !self.toggle_wired {
            return;
        }
        if let Some(sidebar) = self.sidebar.as_mut() {
            sidebar.toggle("collapsed");
        }
        if let Some(wrapper) = self.wrapper.as_mut() {
            wrapper.toggle("sidebar-open");
        }
        if let Some(main) = self.main_content.as_mut() {
            main.toggle("shifted");
        }
    }
}

/// A page after load: its chrome and, for view pages, the running controller.
pub struct LoadedPage {
    pub kind: PageKind,
    pub chrome: PageChrome,
    pub view: Option<(Arc<dyn ViewController>, ViewHandle)>,
}

/// Maps page kinds to freshly built view controllers.
pub struct Router<B> {
    ctx: ViewContext<B>,
    poll_interval: Duration,
}

impl<B: Backend> Router<B> {
    pub fn new(ctx: ViewContext<B>, poll_interval: Duration) -> Self {
        Self { ctx, poll_interval }
    }

    pub fn controller_for(&self, kind: PageKind) -> Option<Arc<dyn ViewController>> {
        match kind {
            PageKind::Dashboard => Some(Arc::new(DetectionsFeed::new(
                self.ctx.clone(),
                self.poll_interval,
            ))),
            PageKind::Agents => Some(Arc::new(AgentsTable::new(self.ctx.clone()))),
            PageKind::Alerts => Some(Arc::new(AlertsList::new(self.ctx.clone()))),
            PageKind::Other => None,
        }
    }

    /// Load a page: resolve its kind once, activate at most one controller
    /// and, independently, wire the sidebar toggle.
    pub fn load(&self, location: &str, mut chrome: PageChrome) -> LoadedPage {
        let kind = PageKind::resolve(location);

        let view = self.controller_for(kind).map(|controller| {
            let handle = Arc::clone(&controller).activate();
            (controller, handle)
        });

        if chrome.wire_sidebar_toggle() {
            tracing::debug!("Sidebar toggle wired");
        }

        tracing::info!(location, page = ?kind, "Page loaded");
        LoadedPage { kind, chrome, view }
    }
}
