//! Rule evaluation results, distinct from raw detections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::severity::{AlertStatus, Severity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub rule_id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}
