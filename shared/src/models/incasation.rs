//! Incasation Model
//!
//! Cash collection record. Each incasation snapshots the revenue and
//! expense summary for the period since the previous one, then resets
//! the running drawer balance to zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One cash collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incasation {
    pub id: i64,

    pub box_code: String,

    /// Cash physically removed from the drawer
    pub collected: i64,

    /// Cash revenue over the covered period
    pub cash_revenue: i64,

    /// Electronic revenue over the covered period
    pub electronic_revenue: i64,

    /// Total expenses over the covered period
    pub total_expenses: i64,

    /// Expense totals keyed by category, sorted for stable output
    #[serde(default)]
    pub expenses_by_category: BTreeMap<String, i64>,

    /// Period start (exclusive); None = since box creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_from: Option<i64>,

    /// Period end (inclusive) = collection instant
    pub period_to: i64,

    /// Operator ID snapshot
    pub actor_id: i64,
    /// Operator name snapshot
    pub actor_name: String,

    pub at: i64,
}
