//! Storage seam
//!
//! The engine treats persistence as an external collaborator behind the
//! [`Store`] trait: per-entity CRUD plus the filtered reads the managers
//! and scheduler need. Conditional writes ([`Store::create_shift`],
//! [`Store::close_shift_if_open`]) must be atomic so the one-open-shift
//! invariant holds even under concurrent callers.
//!
//! [`MemoryStore`] is the bundled implementation used by the binary and
//! every test; deployments inject their own.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use shared::models::{
    Booking, BookingType, CashShift, CashTransaction, Incasation, Resource, RouteType, Slot,
    Tariff, Task,
};

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Database(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage collaborator contract
#[async_trait]
pub trait Store: Send + Sync {
    // ========== Resources ==========

    async fn create_resource(&self, resource: Resource) -> StoreResult<Resource>;

    async fn find_resource(&self, code: &str) -> StoreResult<Option<Resource>>;

    async fn list_resources(&self) -> StoreResult<Vec<Resource>>;

    // ========== Tariffs ==========

    /// Insert or replace the row with the same (booking_type, date) key
    async fn upsert_tariff(&self, tariff: Tariff) -> StoreResult<Tariff>;

    /// All rows for one booking type (default plus date overrides)
    async fn tariffs_for(&self, booking_type: BookingType) -> StoreResult<Vec<Tariff>>;

    // ========== Bookings ==========

    async fn create_booking(&self, booking: Booking) -> StoreResult<Booking>;

    async fn find_booking(&self, id: i64) -> StoreResult<Option<Booking>>;

    /// Full-row replace; managers load, mutate and store under their lock
    async fn update_booking(&self, booking: Booking) -> StoreResult<Booking>;

    /// All bookings on one resource and date, any status
    async fn bookings_for_date(
        &self,
        resource_code: &str,
        date: NaiveDate,
    ) -> StoreResult<Vec<Booking>>;

    /// All bookings on one resource with `from <= date < to`
    async fn bookings_in_range(
        &self,
        resource_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Booking>>;

    /// All bookings on one date across resources (daily summary)
    async fn bookings_on_date(&self, date: NaiveDate) -> StoreResult<Vec<Booking>>;

    /// Held bookings whose `hold_until` lies at or before `now_millis`
    async fn lapsed_holds(&self, now_millis: i64) -> StoreResult<Vec<Booking>>;

    // ========== Quad Slots ==========

    async fn create_slot(&self, slot: Slot) -> StoreResult<Slot>;

    async fn find_slot(&self, id: i64) -> StoreResult<Option<Slot>>;

    /// Slot with the identical window and route, if one was opened
    async fn find_slot_for_window(
        &self,
        date: NaiveDate,
        start_min: u16,
        end_min: u16,
        route: RouteType,
    ) -> StoreResult<Option<Slot>>;

    async fn update_slot(&self, slot: Slot) -> StoreResult<Slot>;

    // ========== Cash Shifts ==========

    /// Conditional create: rejects with [`StoreError::Duplicate`] when the
    /// box already has an open shift. Check and insert are one atomic step.
    async fn create_shift(&self, shift: CashShift) -> StoreResult<CashShift>;

    async fn find_shift(&self, id: i64) -> StoreResult<Option<CashShift>>;

    async fn find_open_shift(&self, box_code: &str) -> StoreResult<Option<CashShift>>;

    /// Open shifts across all boxes (scheduler reconciliation)
    async fn open_shifts(&self) -> StoreResult<Vec<CashShift>>;

    /// Conditional close: transitions an open shift to closed; an already
    /// closed shift is returned unchanged (close is idempotent).
    async fn close_shift_if_open(
        &self,
        id: i64,
        closed_at: i64,
        auto_closed: bool,
    ) -> StoreResult<CashShift>;

    // ========== Cash Transactions ==========

    /// Append-only; rows are never updated or deleted
    async fn append_transaction(&self, tx: CashTransaction) -> StoreResult<CashTransaction>;

    /// Transactions on one box with `at` strictly after `since`
    /// (None = since box creation), ordered by `at`
    async fn transactions_for_box_since(
        &self,
        box_code: &str,
        since: Option<i64>,
    ) -> StoreResult<Vec<CashTransaction>>;

    // ========== Incasations ==========

    async fn append_incasation(&self, incasation: Incasation) -> StoreResult<Incasation>;

    async fn last_incasation(&self, box_code: &str) -> StoreResult<Option<Incasation>>;

    // ========== Tasks ==========

    async fn create_task(&self, task: Task) -> StoreResult<Task>;

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>>;

    async fn tasks_for_date(&self, date: NaiveDate) -> StoreResult<Vec<Task>>;

    /// Dedupe check for scheduler-materialised tasks
    async fn system_task_exists(&self, title: &str, date: NaiveDate) -> StoreResult<bool>;

    /// Mark done; a task already done is returned unchanged
    async fn complete_task(&self, id: i64, done_at: i64) -> StoreResult<Task>;
}
