//! Cash Shift Model

use serde::{Deserialize, Serialize};

/// Shift status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    #[default]
    Open,
    Closed,
}

/// One cash shift on one cash box
///
/// At most one shift per box is OPEN at any time; shifts only move
/// OPEN -> CLOSED, never back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashShift {
    pub id: i64,

    /// Cash box this shift runs on
    pub box_code: String,

    /// Operator ID snapshot
    pub opened_by_id: i64,
    /// Operator name snapshot
    pub opened_by_name: String,

    pub status: ShiftStatus,

    pub opened_at: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,

    /// Closed by the scheduler rather than an operator
    #[serde(default)]
    pub auto_closed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl CashShift {
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }
}
