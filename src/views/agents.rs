//! Agent roster table, fetched once per page load.

use std::sync::Arc;

use super::{Container, StatusCell, ViewContext, ViewController, ViewHandle};
use crate::client::{Backend, Endpoint};
use crate::models::Agent;
use crate::render::{badge, Element, LocalClock, Node};
use crate::router::PageKind;

pub const CONTAINER: &str = ".agents-list";

const COLUMNS: [&str; 5] = ["Name", "Platform", "Version", "Status", "Last Heartbeat"];

/// Badge tone for healthy agents.
const HEALTHY: &str = "low";
/// Badge tone for anything that is not `online`.
const ALERTING: &str = "high";

pub fn render(agents: &[Agent], clock: &LocalClock) -> Vec<Node> {
    if agents.is_empty() {
        return vec![Element::new("p").text("No agents found.").into()];
    }

    let header = Element::new("thead").child(
        Element::new("tr").children(
            COLUMNS
                .iter()
                .map(|c| Element::new("th").text(*c).into()),
        ),
    );

    let rows = agents.iter().map(|a| -> Node {
        let tone = if a.status.is_online() { HEALTHY } else { ALERTING };
        let heartbeat = a
            .last_heartbeat
            .as_ref()
            .map(|at| clock.date_time(at))
            .unwrap_or_else(|| "Never".to_string());

        Element::new("tr")
            .child(Element::new("td").text(a.name.as_str()))
            .child(Element::new("td").text(a.platform.as_str()))
            .child(Element::new("td").text(a.version.as_str()))
            .child(Element::new("td").child(badge(tone, a.status.as_str())))
            .child(Element::new("td").text(heartbeat))
            .into()
    });

    vec![
        Element::new("h2").text("Active Agents").into(),
        Element::new("table")
            .class("data-table")
            .child(header)
            .child(Element::new("tbody").children(rows))
            .into(),
    ]
}

pub struct AgentsTable<B> {
    ctx: ViewContext<B>,
    container: Container,
}

impl<B: Backend> AgentsTable<B> {
    pub fn new(ctx: ViewContext<B>) -> Self {
        Self {
            ctx,
            container: Container::new(CONTAINER),
        }
    }
}

impl<B: Backend> ViewController for AgentsTable<B> {
    fn kind(&self) -> PageKind {
        PageKind::Agents
    }

    fn container(&self) -> &Container {
        &self.container
    }

    fn activate(self: Arc<Self>) -> ViewHandle {
        let (status, state) = StatusCell::new();
        let task = tokio::spawn(async move {
            self.ctx
                .refresh(Endpoint::Agents, &self.container, &status, render)
                .await;
        });
        ViewHandle::new(task, state)
    }
}
