//! Price Calculator
//!
//! Maps (booking type, guest count, date, discount) to a frozen quote.
//! Uses rust_decimal for the percent math; amounts are whole currency
//! units in i64 (the venue currency has no sub-unit).

use chrono::NaiveDate;
use rust_decimal::prelude::*;

use shared::models::{BookingType, PriceQuote, Tariff};

use crate::utils::{AppError, AppResult, validation};

/// Round a Decimal amount to whole currency units (half away from zero)
#[inline]
fn to_units(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Resolve the tariff row for a date
///
/// Lookup order: exact-date override, then the standing default
/// (`date: None`). Returns None when neither exists.
pub fn resolve_tariff(tariffs: &[Tariff], date: NaiveDate) -> Option<&Tariff> {
    tariffs
        .iter()
        .find(|t| t.date == Some(date))
        .or_else(|| tariffs.iter().find(|t| t.date.is_none()))
}

/// Compute a price quote
///
/// `tariffs` holds the rows for one booking type. A missing tariff is a
/// loud `NoTariffConfigured`, never a silent zero.
pub fn quote(
    tariffs: &[Tariff],
    booking_type: BookingType,
    guest_count: i32,
    date: NaiveDate,
    discount_percent: u32,
) -> AppResult<PriceQuote> {
    validation::validate_percent(discount_percent)?;
    if guest_count <= 0 {
        return Err(AppError::validation(format!(
            "Guest count must be positive: {guest_count}"
        )));
    }

    let tariff = resolve_tariff(tariffs, date)
        .ok_or_else(|| AppError::NoTariffConfigured(format!("{booking_type:?} on {date}")))?;

    let base = tariff.base_for(guest_count);

    let discount_amount = if discount_percent == 0 {
        0
    } else {
        let pct = Decimal::from(discount_percent);
        to_units(Decimal::from(base) * pct / Decimal::ONE_HUNDRED)
    };

    Ok(PriceQuote {
        base,
        discount_percent,
        discount_amount,
        total: base - discount_amount,
    })
}
