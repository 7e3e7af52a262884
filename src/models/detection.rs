//! Live detection events raised by agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::severity::Severity;

/// A single detection as returned by `GET /v1/detections`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub id: String,
    pub agent_id: String,
    pub detection_type: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Opaque; any JSON value, `null` included.
    #[serde(default)]
    pub metadata: Value,
}
