//! Recent alerts list, fetched once per page load.

use std::sync::Arc;

use super::{Container, StatusCell, ViewContext, ViewController, ViewHandle};
use crate::client::{Backend, Endpoint};
use crate::models::Alert;
use crate::render::{event_card, Element, LocalClock, Node};
use crate::router::PageKind;

pub const CONTAINER: &str = ".alerts-list";

pub fn render(alerts: &[Alert], clock: &LocalClock) -> Vec<Node> {
    if alerts.is_empty() {
        return vec![Element::new("p").text("No alerts found.").into()];
    }

    let cards = alerts.iter().map(|a| {
        event_card(
            &a.severity,
            clock.date_time(&a.created_at),
            &a.title,
            &a.description,
            format!("Rule: {} | Status: {}", a.rule_id, a.status),
        )
    });

    vec![
        Element::new("h2").text("Recent Alerts").into(),
        Element::new("div")
            .class("detection-list")
            .children(cards)
            .into(),
    ]
}

pub struct AlertsList<B> {
    ctx: ViewContext<B>,
    container: Container,
}

impl<B: Backend> AlertsList<B> {
    pub fn new(ctx: ViewContext<B>) -> Self {
        Self {
            ctx,
            container: Container::new(CONTAINER),
        }
    }
}

impl<B: Backend> ViewController for AlertsList<B> {
    fn kind(&self) -> PageKind {
        PageKind::Alerts
    }

    fn container(&self) -> &Container {
        &self.container
    }

    fn activate(self: Arc<Self>) -> ViewHandle {
        let (status, state) = StatusCell::new();
        let task = tokio::spawn(async move {
            self.ctx
                .refresh(Endpoint::Alerts, &self.container, &status, render)
                .await;
        });
        ViewHandle::new(task, state)
    }
}
