//! In-memory store
//!
//! Every method takes the single `RwLock` for its whole body, so each
//! conditional write (shift create, shift close) is one atomic step.
//! Used by the bundled binary and all tests; data does not survive a
//! restart. Timestamps are stamped by the managers, not here.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use shared::models::{
    Booking, BookingType, CashShift, CashTransaction, Incasation, Resource, RouteType,
    ShiftStatus, Slot, Tariff, Task,
};

use super::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    resources: HashMap<String, Resource>,
    tariffs: Vec<Tariff>,
    bookings: BTreeMap<i64, Booking>,
    slots: BTreeMap<i64, Slot>,
    shifts: BTreeMap<i64, CashShift>,
    transactions: Vec<CashTransaction>,
    incasations: Vec<Incasation>,
    tasks: BTreeMap<i64, Task>,
}

/// In-memory [`Store`] implementation
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ========== Resources ==========

    async fn create_resource(&self, resource: Resource) -> StoreResult<Resource> {
        let mut t = self.inner.write();
        if t.resources.contains_key(&resource.code) {
            return Err(StoreError::Duplicate(format!(
                "Resource {} already exists",
                resource.code
            )));
        }
        t.resources.insert(resource.code.clone(), resource.clone());
        Ok(resource)
    }

    async fn find_resource(&self, code: &str) -> StoreResult<Option<Resource>> {
        Ok(self.inner.read().resources.get(code).cloned())
    }

    async fn list_resources(&self) -> StoreResult<Vec<Resource>> {
        let t = self.inner.read();
        let mut resources: Vec<Resource> = t.resources.values().cloned().collect();
        resources.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(resources)
    }

    // ========== Tariffs ==========

    async fn upsert_tariff(&self, tariff: Tariff) -> StoreResult<Tariff> {
        let mut t = self.inner.write();
        t.tariffs
            .retain(|row| !(row.booking_type == tariff.booking_type && row.date == tariff.date));
        t.tariffs.push(tariff.clone());
        Ok(tariff)
    }

    async fn tariffs_for(&self, booking_type: BookingType) -> StoreResult<Vec<Tariff>> {
        let t = self.inner.read();
        Ok(t.tariffs
            .iter()
            .filter(|row| row.booking_type == booking_type)
            .cloned()
            .collect())
    }

    // ========== Bookings ==========

    async fn create_booking(&self, booking: Booking) -> StoreResult<Booking> {
        let mut t = self.inner.write();
        if t.bookings.contains_key(&booking.id) {
            return Err(StoreError::Duplicate(format!(
                "Booking {} already exists",
                booking.id
            )));
        }
        t.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: i64) -> StoreResult<Option<Booking>> {
        Ok(self.inner.read().bookings.get(&id).cloned())
    }

    async fn update_booking(&self, booking: Booking) -> StoreResult<Booking> {
        let mut t = self.inner.write();
        if !t.bookings.contains_key(&booking.id) {
            return Err(StoreError::NotFound(format!("Booking {}", booking.id)));
        }
        t.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn bookings_for_date(
        &self,
        resource_code: &str,
        date: NaiveDate,
    ) -> StoreResult<Vec<Booking>> {
        let t = self.inner.read();
        Ok(t.bookings
            .values()
            .filter(|b| b.resource_code == resource_code && b.date == date)
            .cloned()
            .collect())
    }

    async fn bookings_in_range(
        &self,
        resource_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Booking>> {
        let t = self.inner.read();
        Ok(t.bookings
            .values()
            .filter(|b| b.resource_code == resource_code && b.date >= from && b.date < to)
            .cloned()
            .collect())
    }

    async fn bookings_on_date(&self, date: NaiveDate) -> StoreResult<Vec<Booking>> {
        let t = self.inner.read();
        Ok(t.bookings
            .values()
            .filter(|b| b.date == date)
            .cloned()
            .collect())
    }

    async fn lapsed_holds(&self, now_millis: i64) -> StoreResult<Vec<Booking>> {
        let t = self.inner.read();
        Ok(t.bookings
            .values()
            .filter(|b| {
                b.status.holds() && b.hold_until.map(|h| h <= now_millis).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    // ========== Quad Slots ==========

    async fn create_slot(&self, slot: Slot) -> StoreResult<Slot> {
        let mut t = self.inner.write();
        if t.slots.contains_key(&slot.id) {
            return Err(StoreError::Duplicate(format!(
                "Slot {} already exists",
                slot.id
            )));
        }
        t.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn find_slot(&self, id: i64) -> StoreResult<Option<Slot>> {
        Ok(self.inner.read().slots.get(&id).cloned())
    }

    async fn find_slot_for_window(
        &self,
        date: NaiveDate,
        start_min: u16,
        end_min: u16,
        route: RouteType,
    ) -> StoreResult<Option<Slot>> {
        let t = self.inner.read();
        Ok(t.slots
            .values()
            .find(|s| {
                s.date == date
                    && s.start_min == start_min
                    && s.end_min == end_min
                    && s.route == route
            })
            .cloned())
    }

    async fn update_slot(&self, slot: Slot) -> StoreResult<Slot> {
        let mut t = self.inner.write();
        if !t.slots.contains_key(&slot.id) {
            return Err(StoreError::NotFound(format!("Slot {}", slot.id)));
        }
        t.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    // ========== Cash Shifts ==========

    async fn create_shift(&self, shift: CashShift) -> StoreResult<CashShift> {
        let mut t = self.inner.write();
        let has_open = t
            .shifts
            .values()
            .any(|s| s.box_code == shift.box_code && s.status == ShiftStatus::Open);
        if has_open {
            return Err(StoreError::Duplicate(format!(
                "Box {} already has an open shift",
                shift.box_code
            )));
        }
        t.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn find_shift(&self, id: i64) -> StoreResult<Option<CashShift>> {
        Ok(self.inner.read().shifts.get(&id).cloned())
    }

    async fn find_open_shift(&self, box_code: &str) -> StoreResult<Option<CashShift>> {
        let t = self.inner.read();
        Ok(t.shifts
            .values()
            .find(|s| s.box_code == box_code && s.status == ShiftStatus::Open)
            .cloned())
    }

    async fn open_shifts(&self) -> StoreResult<Vec<CashShift>> {
        let t = self.inner.read();
        Ok(t.shifts
            .values()
            .filter(|s| s.status == ShiftStatus::Open)
            .cloned()
            .collect())
    }

    async fn close_shift_if_open(
        &self,
        id: i64,
        closed_at: i64,
        auto_closed: bool,
    ) -> StoreResult<CashShift> {
        let mut t = self.inner.write();
        let shift = t
            .shifts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Shift {}", id)))?;
        if shift.status == ShiftStatus::Open {
            shift.status = ShiftStatus::Closed;
            shift.closed_at = Some(closed_at);
            shift.auto_closed = auto_closed;
            shift.updated_at = closed_at;
        }
        Ok(shift.clone())
    }

    // ========== Cash Transactions ==========

    async fn append_transaction(&self, tx: CashTransaction) -> StoreResult<CashTransaction> {
        let mut t = self.inner.write();
        t.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn transactions_for_box_since(
        &self,
        box_code: &str,
        since: Option<i64>,
    ) -> StoreResult<Vec<CashTransaction>> {
        let t = self.inner.read();
        let mut rows: Vec<CashTransaction> = t
            .transactions
            .iter()
            .filter(|tx| tx.box_code == box_code && since.map(|s| tx.at > s).unwrap_or(true))
            .cloned()
            .collect();
        rows.sort_by_key(|tx| tx.at);
        Ok(rows)
    }

    // ========== Incasations ==========

    async fn append_incasation(&self, incasation: Incasation) -> StoreResult<Incasation> {
        let mut t = self.inner.write();
        t.incasations.push(incasation.clone());
        Ok(incasation)
    }

    async fn last_incasation(&self, box_code: &str) -> StoreResult<Option<Incasation>> {
        let t = self.inner.read();
        Ok(t.incasations
            .iter()
            .filter(|i| i.box_code == box_code)
            .max_by_key(|i| i.at)
            .cloned())
    }

    // ========== Tasks ==========

    async fn create_task(&self, task: Task) -> StoreResult<Task> {
        let mut t = self.inner.write();
        if t.tasks.contains_key(&task.id) {
            return Err(StoreError::Duplicate(format!(
                "Task {} already exists",
                task.id
            )));
        }
        t.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.inner.read().tasks.get(&id).cloned())
    }

    async fn tasks_for_date(&self, date: NaiveDate) -> StoreResult<Vec<Task>> {
        let t = self.inner.read();
        let mut tasks: Vec<Task> = t
            .tasks
            .values()
            .filter(|task| task.date == date)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| task.id);
        Ok(tasks)
    }

    async fn system_task_exists(&self, title: &str, date: NaiveDate) -> StoreResult<bool> {
        let t = self.inner.read();
        Ok(t.tasks
            .values()
            .any(|task| task.system_created && task.title == title && task.date == date))
    }

    async fn complete_task(&self, id: i64, done_at: i64) -> StoreResult<Task> {
        let mut t = self.inner.write();
        let task = t
            .tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Task {}", id)))?;
        if !task.done {
            task.done = true;
            task.done_at = Some(done_at);
        }
        Ok(task.clone())
    }
}
