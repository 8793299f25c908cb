//! BookingManager - the booking lifecycle and slot allocation
//!
//! The only writer of bookings and quad slots. Every mutation runs
//! under a per-resource async mutex so the conflict check, the pool
//! math and the write land as one step.
//!
//! # Reservation flow
//!
//! ```text
//! reserve(req)
//!     ├─ 1. Validate texts, guest count, discount percent
//!     ├─ 2. Resolve resource, check kind/type consistency
//!     ├─ 3. Validate window against operating hours
//!     ├─ 4. Take the resource lock
//!     ├─ 5. Overlap / pool capacity check
//!     ├─ 6. Join or open the quad slot (proximity discount)
//!     ├─ 7. Freeze the price quote
//!     ├─ 8. Persist, publish, return
//!     └─ (held statuses carry a hold_until deadline)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Months, NaiveDate};
use dashmap::DashMap;
use tokio::sync::Mutex;

use shared::models::{
    Booking, BookingCreate, BookingPayment, BookingStatus, BookingType, Operator, PaymentMethod,
    Resource, ResourceKind, Slot,
};
use shared::util::snowflake_id;

use crate::booking::allocator::{self, DayOccupancy, WindowSlot};
use crate::core::{Config, EventBus};
use crate::pricing;
use crate::store::Store;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_percent,
    validate_positive_amount, validate_required_text,
};
use crate::utils::{AppError, AppResult, Clock};

/// Booking lifecycle manager
pub struct BookingManager {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    config: Config,
    events: EventBus,
    /// One async mutex per resource code; capacity checks and writes
    /// for a resource serialize on it
    resource_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("resource_locks", &self.resource_locks.len())
            .finish()
    }
}

impl BookingManager {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        config: Config,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            events,
            resource_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, resource_code: &str) -> Arc<Mutex<()>> {
        self.resource_locks
            .entry(resource_code.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Resolve an active resource by code
    async fn resource(&self, code: &str) -> AppResult<Resource> {
        let resource = self
            .store
            .find_resource(code)
            .await?
            .ok_or_else(|| AppError::ResourceUnknown(code.to_string()))?;
        if !resource.active {
            return Err(AppError::ResourceUnknown(code.to_string()));
        }
        Ok(resource)
    }

    fn pool_size(&self, resource: &Resource) -> i32 {
        resource.pool_size.unwrap_or(self.config.quad_pool_size)
    }

    /// Booking types each resource kind can host
    fn check_kind(&self, resource: &Resource, booking_type: BookingType) -> AppResult<()> {
        let ok = matches!(
            (resource.kind, booking_type),
            (ResourceKind::Bath, BookingType::Bath | BookingType::TubOnly)
                | (ResourceKind::SpaRoom, BookingType::Spa)
                | (
                    ResourceKind::QuadUnit,
                    BookingType::QuadShort | BookingType::QuadLong
                )
        );
        if !ok {
            return Err(AppError::validation(format!(
                "{:?} bookings are not offered on {}",
                booking_type, resource.code
            )));
        }
        Ok(())
    }

    // ========== Reads ==========

    pub async fn find(&self, id: i64) -> AppResult<Booking> {
        self.store
            .find_booking(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))
    }

    /// Grid availability of one resource for one day
    pub async fn availability(&self, code: &str, date: NaiveDate) -> AppResult<Vec<WindowSlot>> {
        let resource = self.resource(code).await?;
        let rows = self.store.bookings_for_date(code, date).await?;
        Ok(allocator::availability(
            resource.kind,
            self.pool_size(&resource),
            &rows,
            self.clock.now_millis(),
        ))
    }

    /// Month calendar for one resource kind
    ///
    /// Full means every active resource of the kind has all grid
    /// windows taken; Partial means at least one live booking touches
    /// the day.
    pub async fn month_occupancy(
        &self,
        kind: ResourceKind,
        year: i32,
        month: u32,
    ) -> AppResult<BTreeMap<NaiveDate, DayOccupancy>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::validation(format!("Invalid month: {year}-{month:02}")))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::validation(format!("Invalid month: {year}-{month:02}")))?;

        let resources: Vec<Resource> = self
            .store
            .list_resources()
            .await?
            .into_iter()
            .filter(|r| r.active && r.kind == kind)
            .collect();

        let mut per_resource_rows = Vec::with_capacity(resources.len());
        for resource in &resources {
            let rows = self
                .store
                .bookings_in_range(&resource.code, first, next)
                .await?;
            per_resource_rows.push(rows);
        }

        let now = self.clock.now_millis();
        let mut calendar = BTreeMap::new();
        for day in first.iter_days().take_while(|d| *d < next) {
            let mut windows = Vec::with_capacity(resources.len());
            let mut has_occupying = false;
            for (resource, rows) in resources.iter().zip(&per_resource_rows) {
                let day_rows: Vec<Booking> =
                    rows.iter().filter(|b| b.date == day).cloned().collect();
                has_occupying = has_occupying || day_rows.iter().any(|b| b.occupies(now));
                windows.push(allocator::availability(
                    kind,
                    self.pool_size(resource),
                    &day_rows,
                    now,
                ));
            }
            calendar.insert(day, allocator::day_occupancy(&windows, has_occupying));
        }
        Ok(calendar)
    }

    // ========== Reservation ==========

    /// Create a booking
    ///
    /// Staff-created bookings pass `instant_confirm` and start
    /// Confirmed; guest requests start PendingCall with a callback
    /// hold. The price quote is frozen here and never recomputed.
    pub async fn reserve(&self, req: BookingCreate, operator: &Operator) -> AppResult<Booking> {
        validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&req.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
        if req.guest_count <= 0 {
            return Err(AppError::validation(format!(
                "Guest count must be positive: {}",
                req.guest_count
            )));
        }
        if let Some(pct) = req.discount_percent {
            validate_percent(pct)?;
        }
        if req.prepayment < 0 {
            return Err(AppError::validation(format!(
                "Prepayment must not be negative: {}",
                req.prepayment
            )));
        }

        let resource = self.resource(&req.resource_code).await?;
        self.check_kind(&resource, req.booking_type)?;
        allocator::validate_window(
            req.start_min,
            req.end_min,
            self.config.open_min(),
            self.config.close_min(),
        )?;

        let tariffs = self.store.tariffs_for(req.booking_type).await?;

        let lock = self.lock_for(&req.resource_code);
        let _guard = lock.lock().await;

        let now = self.clock.now_millis();
        let day_rows = self
            .store
            .bookings_for_date(&req.resource_code, req.date)
            .await?;

        let mut slot_id = None;
        let mut proximity = false;

        match resource.kind {
            ResourceKind::Bath | ResourceKind::SpaRoom => {
                if !allocator::window_free(&day_rows, req.start_min, req.end_min, now) {
                    return Err(AppError::conflict(format!(
                        "{} {} {}-{} overlaps an existing booking",
                        resource.code,
                        req.date,
                        allocator::fmt_min(req.start_min),
                        allocator::fmt_min(req.end_min)
                    )));
                }
            }
            ResourceKind::QuadUnit => {
                let pool = self.pool_size(&resource);
                let remaining =
                    allocator::quads_remaining(pool, &day_rows, req.start_min, req.end_min, now);
                if remaining < req.guest_count {
                    return Err(AppError::conflict(format!(
                        "Only {} of {} quads free {} {}-{}",
                        remaining,
                        pool,
                        req.date,
                        allocator::fmt_min(req.start_min),
                        allocator::fmt_min(req.end_min)
                    )));
                }

                // route() is Some for every quad booking type
                let route = req.booking_type.route().ok_or_else(|| {
                    AppError::internal(format!("No route for {:?}", req.booking_type))
                })?;

                let slot = self
                    .store
                    .find_slot_for_window(req.date, req.start_min, req.end_min, route)
                    .await?;

                let slot = match slot {
                    Some(mut slot) => {
                        // Recompute the roster from live bookings so a
                        // lapsed hold nobody swept yet does not inflate it
                        let live: i32 = day_rows
                            .iter()
                            .filter(|b| b.slot_id == Some(slot.id) && b.occupies(now))
                            .map(|b| b.guest_count)
                            .sum();
                        proximity = live > 0;
                        slot.booked_quads = live + req.guest_count;
                        slot.discount_applied = slot.discount_applied || proximity;
                        slot.updated_at = now;
                        let slot = self.store.update_slot(slot).await?;
                        self.events
                            .publish("slot", "updated", &slot.id.to_string(), Some(&slot));
                        slot
                    }
                    None => {
                        let slot = Slot {
                            id: snowflake_id(),
                            date: req.date,
                            start_min: req.start_min,
                            end_min: req.end_min,
                            route,
                            total_quads: pool,
                            booked_quads: req.guest_count,
                            discount_applied: false,
                            created_at: now,
                            updated_at: now,
                        };
                        let slot = self.store.create_slot(slot).await?;
                        self.events
                            .publish("slot", "created", &slot.id.to_string(), Some(&slot));
                        slot
                    }
                };
                slot_id = Some(slot.id);
            }
        }

        let operator_pct = req.discount_percent.unwrap_or(0);
        let proximity_pct = if proximity {
            self.config.proximity_discount_percent
        } else {
            0
        };
        let combined_pct = (operator_pct + proximity_pct).min(100);

        let price = pricing::quote(
            &tariffs,
            req.booking_type,
            req.guest_count,
            req.date,
            combined_pct,
        )?;

        let (status, hold_until) = if req.instant_confirm {
            (BookingStatus::Confirmed, None)
        } else {
            (
                BookingStatus::PendingCall,
                Some(now + self.config.hold_pending_millis()),
            )
        };

        let booking = Booking {
            id: snowflake_id(),
            resource_code: req.resource_code,
            booking_type: req.booking_type,
            date: req.date,
            start_min: req.start_min,
            end_min: req.end_min,
            guest_count: req.guest_count,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            status,
            price,
            proximity_discount: proximity,
            prepayment: req.prepayment,
            paid_cash: 0,
            paid_electronic: 0,
            hold_until,
            slot_id,
            note: req.note,
            created_by_id: operator.id,
            created_by_name: operator.name.clone(),
            created_at: now,
            updated_at: now,
        };
        let booking = self.store.create_booking(booking).await?;

        tracing::info!(
            booking_id = booking.id,
            resource = %booking.resource_code,
            date = %booking.date,
            status = ?booking.status,
            total = booking.price.total,
            proximity = booking.proximity_discount,
            "Booking created"
        );
        self.events
            .publish("booking", "created", &booking.id.to_string(), Some(&booking));
        Ok(booking)
    }

    // ========== Lifecycle transitions ==========

    /// Move a booking to `to` under the resource lock
    ///
    /// Confirming or escalating a booking whose hold already lapsed
    /// flips it to Expired instead and reports [`AppError::HoldExpired`];
    /// the window was already treated as free.
    async fn transition(&self, id: i64, to: BookingStatus) -> AppResult<Booking> {
        let preview = self.find(id).await?;
        let lock = self.lock_for(&preview.resource_code);
        let _guard = lock.lock().await;

        let mut booking = self.find(id).await?;
        let now = self.clock.now_millis();

        let escalating = matches!(
            to,
            BookingStatus::Confirmed | BookingStatus::AwaitingPrepayment
        );
        if escalating
            && booking.status.holds()
            && let Some(t) = booking.hold_until
            && now >= t
        {
            let expired = self.apply_transition(booking, BookingStatus::Expired, now).await?;
            tracing::warn!(booking_id = expired.id, "Hold lapsed before confirmation");
            return Err(AppError::HoldExpired(format!(
                "Booking {} hold lapsed, window was released",
                expired.id
            )));
        }

        if !booking.status.can_transition(to) {
            return Err(AppError::invalid_transition(format!(
                "{:?} -> {:?} for booking {}",
                booking.status, to, booking.id
            )));
        }

        if to == BookingStatus::AwaitingPrepayment {
            booking.hold_until = Some(now + self.config.hold_prepayment_millis());
        }
        self.apply_transition(booking, to, now).await
    }

    /// Write the status change and release held capacity
    async fn apply_transition(
        &self,
        mut booking: Booking,
        to: BookingStatus,
        now: i64,
    ) -> AppResult<Booking> {
        booking.status = to;
        booking.updated_at = now;
        if !to.holds() {
            booking.hold_until = None;
        }
        if to.is_terminal() {
            self.release_slot(&booking, now).await?;
        }
        let booking = self.store.update_booking(booking).await?;

        tracing::info!(
            booking_id = booking.id,
            resource = %booking.resource_code,
            status = ?booking.status,
            "Booking transitioned"
        );
        self.events
            .publish("booking", "updated", &booking.id.to_string(), Some(&booking));
        Ok(booking)
    }

    /// Give machines back to the quad slot roster
    async fn release_slot(&self, booking: &Booking, now: i64) -> AppResult<()> {
        let Some(slot_id) = booking.slot_id else {
            return Ok(());
        };
        let Some(mut slot) = self.store.find_slot(slot_id).await? else {
            return Ok(());
        };
        slot.booked_quads = (slot.booked_quads - booking.guest_count).max(0);
        slot.updated_at = now;
        let slot = self.store.update_slot(slot).await?;
        self.events
            .publish("slot", "updated", &slot.id.to_string(), Some(&slot));
        Ok(())
    }

    /// Staff reached the guest, prepayment was agreed; the hold is
    /// re-armed with the longer prepayment deadline
    pub async fn request_prepayment(&self, id: i64) -> AppResult<Booking> {
        self.transition(id, BookingStatus::AwaitingPrepayment).await
    }

    pub async fn confirm(&self, id: i64) -> AppResult<Booking> {
        self.transition(id, BookingStatus::Confirmed).await
    }

    pub async fn cancel(&self, id: i64) -> AppResult<Booking> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    pub async fn complete(&self, id: i64) -> AppResult<Booking> {
        self.transition(id, BookingStatus::Completed).await
    }

    pub async fn no_show(&self, id: i64) -> AppResult<Booking> {
        self.transition(id, BookingStatus::NoShow).await
    }

    // ========== Payments ==========

    /// Record a payment against a non-terminal booking
    ///
    /// Payments accumulate on the booking; the cash ledger records its
    /// own transaction separately.
    pub async fn record_payment(&self, id: i64, payment: BookingPayment) -> AppResult<Booking> {
        validate_positive_amount(payment.amount, "amount")?;

        let preview = self.find(id).await?;
        let lock = self.lock_for(&preview.resource_code);
        let _guard = lock.lock().await;

        let mut booking = self.find(id).await?;
        if booking.status.is_terminal() {
            return Err(AppError::invalid_transition(format!(
                "Cannot record payment on {:?} booking {}",
                booking.status, booking.id
            )));
        }
        match payment.method {
            PaymentMethod::Cash => booking.paid_cash += payment.amount,
            PaymentMethod::Card => booking.paid_electronic += payment.amount,
        }
        booking.updated_at = self.clock.now_millis();
        let booking = self.store.update_booking(booking).await?;

        tracing::info!(
            booking_id = booking.id,
            method = ?payment.method,
            amount = payment.amount,
            operator = %payment.operator.name,
            "Payment recorded"
        );
        self.events
            .publish("booking", "updated", &booking.id.to_string(), Some(&booking));
        Ok(booking)
    }

    // ========== Hold sweep ==========

    /// Flip every lapsed hold to Expired and release its capacity
    ///
    /// The sweep is an eager cleanup; capacity checks already ignore
    /// lapsed holds, so running it late never double-books.
    pub async fn expire_lapsed_holds(&self) -> AppResult<usize> {
        let now = self.clock.now_millis();
        let lapsed = self.store.lapsed_holds(now).await?;
        let mut expired = 0;

        for stale in lapsed {
            let lock = self.lock_for(&stale.resource_code);
            let _guard = lock.lock().await;

            // Reload: the hold may have been confirmed since the scan
            let Some(booking) = self.store.find_booking(stale.id).await? else {
                continue;
            };
            let lapsed_now = booking.status.holds()
                && booking.hold_until.map(|t| now >= t).unwrap_or(false);
            if !lapsed_now {
                continue;
            }
            self.apply_transition(booking, BookingStatus::Expired, now)
                .await?;
            expired += 1;
        }

        if expired > 0 {
            tracing::info!(expired, "Lapsed holds expired");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::utils::SystemClock;
    use shared::models::{Role, Tariff};
    use shared::util::now_millis as wall_now;

    fn test_config() -> Config {
        let mut config = Config::from_env();
        config.open_hour = 9;
        config.close_hour = 23;
        config.quad_pool_size = 4;
        config.proximity_discount_percent = 5;
        config.hold_pending_minutes = 360;
        config.hold_prepayment_minutes = 2880;
        config
    }

    async fn test_manager() -> BookingManager {
        let store = Arc::new(MemoryStore::new());
        let now = wall_now();
        store
            .create_resource(Resource {
                id: 1,
                code: "B1".into(),
                kind: ResourceKind::Bath,
                name: "Bath house 1".into(),
                pool_size: None,
                active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        store
            .create_resource(Resource {
                id: 2,
                code: "QUAD".into(),
                kind: ResourceKind::QuadUnit,
                name: "Quad fleet".into(),
                pool_size: Some(4),
                active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        for (booking_type, base, per_guest) in [
            (BookingType::Bath, 5000, false),
            (BookingType::QuadShort, 3500, true),
        ] {
            store
                .upsert_tariff(Tariff {
                    id: 0,
                    booking_type,
                    date: None,
                    base,
                    threshold_guests: None,
                    base_over_threshold: None,
                    per_guest,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        BookingManager::new(store, Arc::new(SystemClock), test_config(), EventBus::new())
    }

    fn operator() -> Operator {
        Operator::new(1, "Test Operator", Role::Staff)
    }

    fn bath_request(start_min: u16, end_min: u16) -> BookingCreate {
        BookingCreate {
            resource_code: "B1".into(),
            booking_type: BookingType::Bath,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_min,
            end_min,
            guest_count: 4,
            customer_name: "Anna".into(),
            customer_phone: "+70000000001".into(),
            discount_percent: None,
            prepayment: 0,
            note: None,
            instant_confirm: true,
        }
    }

    fn quad_request(guests: i32, phone: &str) -> BookingCreate {
        BookingCreate {
            resource_code: "QUAD".into(),
            booking_type: BookingType::QuadShort,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_min: 600,
            end_min: 720,
            guest_count: guests,
            customer_name: "Rider".into(),
            customer_phone: phone.into(),
            discount_percent: None,
            prepayment: 0,
            note: None,
            instant_confirm: true,
        }
    }

    #[tokio::test]
    async fn test_overlap_rejected_adjacent_allowed() {
        let manager = test_manager().await;
        let op = operator();

        manager.reserve(bath_request(600, 780), &op).await.unwrap();

        let err = manager.reserve(bath_request(720, 900), &op).await;
        assert!(matches!(err, Err(AppError::Conflict(_))));

        // Half-open windows: back-to-back is fine
        manager.reserve(bath_request(780, 960), &op).await.unwrap();
    }

    #[tokio::test]
    async fn test_quad_join_grants_proximity_discount() {
        let manager = test_manager().await;
        let op = operator();

        let first = manager.reserve(quad_request(2, "+7001"), &op).await.unwrap();
        assert!(!first.proximity_discount);
        assert_eq!(first.price.total, 7000);

        let second = manager.reserve(quad_request(2, "+7002"), &op).await.unwrap();
        assert!(second.proximity_discount);
        assert_eq!(second.slot_id, first.slot_id);
        // 3500 x 2 = 7000, minus 5% = 6650
        assert_eq!(second.price.total, 6650);

        // Pool of 4 is now exhausted
        let third = manager.reserve(quad_request(1, "+7003"), &op).await;
        assert!(matches!(third, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_kind_mismatch_rejected() {
        let manager = test_manager().await;
        let mut req = bath_request(600, 780);
        req.booking_type = BookingType::Spa;
        let err = manager.reserve(req, &operator()).await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_resource_rejected() {
        let manager = test_manager().await;
        let mut req = bath_request(600, 780);
        req.resource_code = "B9".into();
        let err = manager.reserve(req, &operator()).await;
        assert!(matches!(err, Err(AppError::ResourceUnknown(_))));
    }

    #[tokio::test]
    async fn test_transition_table_enforced() {
        let manager = test_manager().await;
        let booking = manager
            .reserve(bath_request(600, 780), &operator())
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        // Confirmed cannot go back to AwaitingPrepayment
        let err = manager.request_prepayment(booking.id).await;
        assert!(matches!(err, Err(AppError::InvalidTransition(_))));

        let done = manager.complete(booking.id).await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);

        // Terminal is final
        let err = manager.cancel(booking.id).await;
        assert!(matches!(err, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_cancel_releases_window() {
        let manager = test_manager().await;
        let op = operator();
        let booking = manager.reserve(bath_request(600, 780), &op).await.unwrap();

        assert!(matches!(
            manager.reserve(bath_request(600, 780), &op).await,
            Err(AppError::Conflict(_))
        ));

        manager.cancel(booking.id).await.unwrap();
        manager.reserve(bath_request(600, 780), &op).await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_accumulates() {
        let manager = test_manager().await;
        let booking = manager
            .reserve(bath_request(600, 780), &operator())
            .await
            .unwrap();

        let paid = manager
            .record_payment(
                booking.id,
                BookingPayment {
                    method: PaymentMethod::Cash,
                    amount: 2000,
                    operator: operator(),
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.paid_cash, 2000);

        let paid = manager
            .record_payment(
                booking.id,
                BookingPayment {
                    method: PaymentMethod::Card,
                    amount: 3000,
                    operator: operator(),
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.paid_cash, 2000);
        assert_eq!(paid.paid_electronic, 3000);
    }

    #[tokio::test]
    async fn test_month_occupancy_flags() {
        let manager = test_manager().await;
        let op = operator();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let calendar = manager
            .month_occupancy(ResourceKind::Bath, 2025, 6)
            .await
            .unwrap();
        assert_eq!(calendar.len(), 30);
        assert_eq!(calendar[&date], DayOccupancy::None);

        manager.reserve(bath_request(600, 780), &op).await.unwrap();
        let calendar = manager
            .month_occupancy(ResourceKind::Bath, 2025, 6)
            .await
            .unwrap();
        assert_eq!(calendar[&date], DayOccupancy::Partial);

        manager.reserve(bath_request(780, 960), &op).await.unwrap();
        manager.reserve(bath_request(960, 1140), &op).await.unwrap();
        manager.reserve(bath_request(1140, 1320), &op).await.unwrap();
        let calendar = manager
            .month_occupancy(ResourceKind::Bath, 2025, 6)
            .await
            .unwrap();
        assert_eq!(calendar[&date], DayOccupancy::Full);
    }
}
