//! Monitored endpoints registered with the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::severity::AgentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub name: String,
    pub platform: String,
    pub version: String,
    pub status: AgentStatus,
    #[serde(default)]
    pub last_heartbeat: Option<DateTime<Utc>>,
}
