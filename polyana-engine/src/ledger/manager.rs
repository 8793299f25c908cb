//! CashLedger - shifts, transactions and incasation
//!
//! One open shift per box, enforced by the store's conditional create.
//! Transactions are append-only and always belong to an open shift;
//! the drawer balance is derived by summing signed amounts since the
//! last incasation, never stored.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use shared::models::{
    CashShift, CashTransaction, Incasation, Operator, PaymentMethod, Role, ShiftStatus,
    TransactionKind,
};
use shared::util::snowflake_id;

use crate::core::EventBus;
use crate::store::{Store, StoreError};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_positive_amount,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, Clock};

/// Cash ledger manager
pub struct CashLedger {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    /// One async mutex per box code; every ledger mutation for a box
    /// serializes on it
    box_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for CashLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashLedger")
            .field("box_locks", &self.box_locks.len())
            .finish()
    }
}

impl CashLedger {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, events: EventBus) -> Self {
        Self {
            store,
            clock,
            events,
            box_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, box_code: &str) -> Arc<Mutex<()>> {
        self.box_locks
            .entry(box_code.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ========== Shift lifecycle ==========

    /// Open a shift on a box
    ///
    /// Rejects with [`AppError::ShiftAlreadyOpen`] while the box has
    /// one; the check rides on the store's conditional create, so two
    /// concurrent opens cannot both win.
    pub async fn open_shift(
        &self,
        box_code: &str,
        operator: &Operator,
        note: Option<String>,
    ) -> AppResult<CashShift> {
        validate_required_text(box_code, "box_code", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;

        let lock = self.lock_for(box_code);
        let _guard = lock.lock().await;

        let now = self.clock.now_millis();
        let shift = CashShift {
            id: snowflake_id(),
            box_code: box_code.to_string(),
            opened_by_id: operator.id,
            opened_by_name: operator.name.clone(),
            status: ShiftStatus::Open,
            opened_at: now,
            closed_at: None,
            auto_closed: false,
            note,
            created_at: now,
            updated_at: now,
        };
        let shift = match self.store.create_shift(shift).await {
            Ok(shift) => shift,
            Err(StoreError::Duplicate(_)) => {
                return Err(AppError::ShiftAlreadyOpen(box_code.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            shift_id = shift.id,
            box_code = %shift.box_code,
            operator = %shift.opened_by_name,
            "Shift opened"
        );
        self.events
            .publish("shift", "created", &shift.id.to_string(), Some(&shift));
        Ok(shift)
    }

    pub async fn find_shift(&self, id: i64) -> AppResult<CashShift> {
        self.store
            .find_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shift {id}")))
    }

    /// The open shift on a box, if any
    pub async fn current_shift(&self, box_code: &str) -> AppResult<Option<CashShift>> {
        Ok(self.store.find_open_shift(box_code).await?)
    }

    /// Close a shift
    ///
    /// Idempotent: closing an already closed shift returns it
    /// unchanged with its original closure time, no event.
    pub async fn close_shift(&self, shift_id: i64, auto: bool) -> AppResult<CashShift> {
        let preview = self.find_shift(shift_id).await?;
        let lock = self.lock_for(&preview.box_code);
        let _guard = lock.lock().await;

        let was_open = self.find_shift(shift_id).await?.is_open();
        let shift = self
            .store
            .close_shift_if_open(shift_id, self.clock.now_millis(), auto)
            .await?;

        if was_open {
            tracing::info!(
                shift_id = shift.id,
                box_code = %shift.box_code,
                auto_closed = shift.auto_closed,
                "Shift closed"
            );
            self.events
                .publish("shift", "closed", &shift.id.to_string(), Some(&shift));
        } else {
            tracing::debug!(shift_id = shift.id, "Shift already closed, no-op");
        }
        Ok(shift)
    }

    /// Close every open shift across all boxes; returns how many closed
    pub async fn close_all_open(&self, auto: bool) -> AppResult<usize> {
        let open = self.store.open_shifts().await?;
        let mut closed = 0;
        for shift in open {
            self.close_shift(shift.id, auto).await?;
            closed += 1;
        }
        Ok(closed)
    }

    // ========== Transactions ==========

    /// Append a transaction to an open shift
    ///
    /// Expense rows must carry a category; the stored amount is always
    /// positive, sign comes from the kind.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_transaction(
        &self,
        shift_id: i64,
        kind: TransactionKind,
        method: PaymentMethod,
        amount: i64,
        category: Option<String>,
        source: Option<String>,
        operator: &Operator,
    ) -> AppResult<CashTransaction> {
        validate_positive_amount(amount, "amount")?;
        validate_optional_text(&category, "category", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&source, "source", MAX_NOTE_LEN)?;
        if kind == TransactionKind::Expense
            && category.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Err(AppError::validation(
                "Expense transactions require a category",
            ));
        }

        let preview = self.find_shift(shift_id).await?;
        let lock = self.lock_for(&preview.box_code);
        let _guard = lock.lock().await;

        // Reload under the lock: the shift may have closed meanwhile
        let shift = self.find_shift(shift_id).await?;
        if !shift.is_open() {
            return Err(AppError::ShiftNotOpen(format!(
                "Shift {} on box {}",
                shift.id, shift.box_code
            )));
        }

        let tx = CashTransaction {
            id: snowflake_id(),
            shift_id: shift.id,
            box_code: shift.box_code.clone(),
            kind,
            method,
            amount,
            category,
            source,
            actor_id: operator.id,
            actor_name: operator.name.clone(),
            at: self.clock.now_millis(),
        };
        let tx = self.store.append_transaction(tx).await?;

        tracing::info!(
            tx_id = tx.id,
            shift_id = tx.shift_id,
            box_code = %tx.box_code,
            kind = ?tx.kind,
            method = ?tx.method,
            amount = tx.amount,
            "Transaction recorded"
        );
        self.events
            .publish("transaction", "created", &tx.id.to_string(), Some(&tx));
        Ok(tx)
    }

    // ========== Balance and incasation ==========

    /// Signed drawer balance since the last incasation
    ///
    /// Spans shifts: closing a shift does not reset the drawer, only
    /// incasation does.
    pub async fn current_balance(&self, box_code: &str) -> AppResult<i64> {
        let since = self
            .store
            .last_incasation(box_code)
            .await?
            .map(|inc| inc.at);
        let txs = self
            .store
            .transactions_for_box_since(box_code, since)
            .await?;
        Ok(txs.iter().map(|tx| tx.signed_cash_amount()).sum())
    }

    /// Collect the drawer
    ///
    /// Admin only. Summarises the period since the previous incasation
    /// and zeroes the running balance by becoming the new period start.
    pub async fn incasate(&self, box_code: &str, operator: &Operator) -> AppResult<Incasation> {
        if operator.role != Role::Admin {
            return Err(AppError::forbidden(format!(
                "Incasation on box {box_code} requires the admin role"
            )));
        }

        let lock = self.lock_for(box_code);
        let _guard = lock.lock().await;

        let since = self
            .store
            .last_incasation(box_code)
            .await?
            .map(|inc| inc.at);
        let txs = self
            .store
            .transactions_for_box_since(box_code, since)
            .await?;

        let collected: i64 = txs.iter().map(|tx| tx.signed_cash_amount()).sum();
        if collected <= 0 {
            return Err(AppError::NothingToCollect(box_code.to_string()));
        }

        let mut cash_revenue = 0;
        let mut electronic_revenue = 0;
        let mut total_expenses = 0;
        let mut expenses_by_category: BTreeMap<String, i64> = BTreeMap::new();
        for tx in &txs {
            match (tx.kind, tx.method) {
                (TransactionKind::CashIn, PaymentMethod::Cash) => cash_revenue += tx.amount,
                (TransactionKind::CashIn, PaymentMethod::Card) => electronic_revenue += tx.amount,
                (TransactionKind::Expense, _) => {
                    total_expenses += tx.amount;
                    let category = tx.category.clone().unwrap_or_else(|| "other".into());
                    *expenses_by_category.entry(category).or_insert(0) += tx.amount;
                }
                (TransactionKind::CashOut, _) => {}
            }
        }

        let now = self.clock.now_millis();
        let incasation = Incasation {
            id: snowflake_id(),
            box_code: box_code.to_string(),
            collected,
            cash_revenue,
            electronic_revenue,
            total_expenses,
            expenses_by_category,
            period_from: since,
            period_to: now,
            actor_id: operator.id,
            actor_name: operator.name.clone(),
            at: now,
        };
        let incasation = self.store.append_incasation(incasation).await?;

        tracing::info!(
            incasation_id = incasation.id,
            box_code = %incasation.box_code,
            collected = incasation.collected,
            actor = %incasation.actor_name,
            "Incasation recorded"
        );
        self.events.publish(
            "incasation",
            "created",
            &incasation.id.to_string(),
            Some(&incasation),
        );
        Ok(incasation)
    }
}
