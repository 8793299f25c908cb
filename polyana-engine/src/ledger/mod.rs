//! Cash ledger domain
//!
//! - [`CashLedger`] - shift lifecycle, append-only transactions,
//!   drawer balance and incasation

pub mod manager;

pub use manager::CashLedger;
