//! Task Model
//!
//! Daily staff checklist items. Recurring definitions live in code;
//! the scheduler materialises one row per definition per due date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One materialised task on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,

    pub title: String,

    /// Due date (venue-local)
    pub date: NaiveDate,

    /// Sub-items shown under the task
    #[serde(default)]
    pub checklist: Vec<String>,

    #[serde(default)]
    pub done: bool,

    /// Materialised by the scheduler (dedupe key with title+date)
    #[serde(default)]
    pub system_created: bool,

    pub created_at: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_at: Option<i64>,
}
