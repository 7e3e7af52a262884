//! Pure render functions: records in, typed markup out.

pub mod node;
pub mod time;

pub use node::{to_html, to_text, Element, Node};
pub use time::LocalClock;

use crate::models::Severity;

/// Badge span styled by a severity-like class.
pub fn badge(tone: &str, label: impl Into<String>) -> Element {
    Element::new("span").class("badg").class(tone).text(label)
}

/// Event card shared by the detections feed and the alerts list.
pub fn event_card(
    severity: &Severity,
    time: String,
    title: &str,
    description: &str,
    meta: String,
) -> Node {
    Element::new("div")
        .class("detection-card")
        .class(severity.as_str())
        .child(
            Element::new("div")
                .class("detection-header")
                .child(badge(severity.as_str(), severity.badge_label()))
                .child(Element::new("span").class("time").text(time)),
        )
        .child(Element::new("h3").text(title))
        .child(Element::new("p").text(description))
        .child(
            Element::new("div")
                .class("meta")
                .child(Element::new("small").text(meta)),
        )
        .into()
}
