//! Live detections feed on the dashboard page.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use super::{Container, StatusCell, ViewContext, ViewController, ViewHandle, ViewState};
use crate::client::{Backend, Endpoint};
use crate::models::Detection;
use crate::render::{event_card, Element, LocalClock, Node};
use crate::router::PageKind;

pub const CONTAINER: &str = ".live-detections";

const HEADING: &str = "Live Detections";
const EMPTY_PRIMARY: &str = "No live detections at the moment.";
const EMPTY_SECONDARY: &str = "Monitor your game servers for suspicious activity.";

/// Render the detections container content.
pub fn render(detections: &[Detection], clock: &LocalClock) -> Vec<Node> {
    let heading: Node = Element::new("h2").text(HEADING).into();

    if detections.is_empty() {
        return vec![
            heading,
            Element::new("div")
                .class("empty-state")
                .child(Element::new("p").text(EMPTY_PRIMARY))
                .child(Element::new("p").text(EMPTY_SECONDARY))
                .into(),
        ];
    }

    let cards = detections.iter().map(|d| {
        event_card(
            &d.severity,
            clock.time_of_day(&d.created_at),
            &d.title,
            &d.description,
            format!("Agent: {} | Type: {}", d.agent_id, d.detection_type),
        )
    });

    vec![
        heading,
        Element::new("div")
            .class("detection-list")
            .children(cards)
            .into(),
    ]
}

/// Polls `/v1/detections` on a fixed interval for the page's lifetime.
///
/// Ticks never wait for the previous fetch: overlapping fetches are allowed
/// and whichever response lands last owns the container.
pub struct DetectionsFeed<B> {
    ctx: ViewContext<B>,
    container: Container,
    interval: Duration,
}

impl<B: Backend> DetectionsFeed<B> {
    pub fn new(ctx: ViewContext<B>, interval: Duration) -> Self {
        Self {
            ctx,
            container: Container::new(CONTAINER),
            interval,
        }
    }

    async fn cycle(&self, status: &StatusCell) -> ViewState {
        self.ctx
            .refresh(Endpoint::Detections, &self.container, status, render)
            .await
    }
}

impl<B: Backend> ViewController for DetectionsFeed<B> {
    fn kind(&self) -> PageKind {
        PageKind::Dashboard
    }

    fn container(&self) -> &Container {
        &self.container
    }

    fn activate(self: Arc<Self>) -> ViewHandle {
        let (status, state) = StatusCell::new();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight = JoinSet::new();

            tracing::info!(interval_secs = self.interval.as_secs(), "Detection feed started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let feed = Arc::clone(&self);
                        let status = status.clone();
                        in_flight.spawn(async move { feed.cycle(&status).await });
                    }
                    Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                        if let Ok(ViewState::Unauthorized) = done {
                            tracing::info!("Detection feed stopped, session expired");
                            break;
                        }
                    }
                }
            }
        });

        ViewHandle::new(task, state)
    }
}
