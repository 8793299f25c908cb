//! Cash Transaction Model
//!
//! Append-only ledger rows. A transaction always belongs to an open
//! shift; nothing here is ever updated or deleted.

use serde::{Deserialize, Serialize};

/// Transaction kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Revenue in (booking payment, float top-up)
    CashIn,
    /// Cash taken out of the drawer (not an expense)
    CashOut,
    /// Categorised operating expense
    Expense,
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// One ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashTransaction {
    pub id: i64,

    /// Open shift this row was recorded under
    pub shift_id: i64,

    /// Denormalised from the shift for box-scoped queries
    pub box_code: String,

    pub kind: TransactionKind,

    pub method: PaymentMethod,

    /// Always positive; sign comes from `kind`
    pub amount: i64,

    /// Expense category (Expense rows only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Free-form origin, e.g. a booking reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Operator ID snapshot
    pub actor_id: i64,
    /// Operator name snapshot
    pub actor_name: String,

    pub at: i64,
}

impl CashTransaction {
    /// Signed effect on the physical drawer.
    ///
    /// Card revenue never touches the drawer; outflows count in cash
    /// regardless of method.
    pub fn signed_cash_amount(&self) -> i64 {
        match (self.kind, self.method) {
            (TransactionKind::CashIn, PaymentMethod::Cash) => self.amount,
            (TransactionKind::CashIn, PaymentMethod::Card) => 0,
            (TransactionKind::CashOut, _) => -self.amount,
            (TransactionKind::Expense, _) => -self.amount,
        }
    }
}
