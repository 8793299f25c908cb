//! Booking lifecycle against a fully wired engine: window conflicts,
//! quad slot pooling, hold expiry and frozen price snapshots.

mod common;

use chrono::NaiveDate;
use common::{bath_request, harness_at, moscow, quad_request, staff};
use polyana_engine::{AppError, Clock, Store};
use shared::models::{BookingStatus, BookingType, Tariff};
use shared::util::snowflake_id;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

#[tokio::test]
async fn test_overlapping_window_rejected_adjacent_allowed() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    h.state
        .booking
        .reserve(bath_request(day(), 600, 780), &op)
        .await
        .unwrap();

    // 11:40-13:20 overlaps 10:00-13:00
    let err = h
        .state
        .booking
        .reserve(bath_request(day(), 700, 800), &op)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Touching windows share the boundary minute
    h.state
        .booking
        .reserve(bath_request(day(), 780, 960), &op)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_quad_join_shares_slot_and_discount() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    let first = h
        .state
        .booking
        .reserve(quad_request(day(), 600, 720, 2), &op)
        .await
        .unwrap();
    assert!(!first.proximity_discount);
    assert_eq!(first.price.total, 7_000);

    let second = h
        .state
        .booking
        .reserve(quad_request(day(), 600, 720, 2), &op)
        .await
        .unwrap();
    assert!(second.proximity_discount);
    assert_eq!(second.price.base, 7_000);
    assert_eq!(second.price.discount_amount, 350);
    assert_eq!(second.price.total, 6_650);
    assert_eq!(second.slot_id, first.slot_id);

    // Pool of 4 is exhausted
    let err = h
        .state
        .booking
        .reserve(quad_request(day(), 600, 720, 1), &op)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_reserve_single_winner() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();
    let booking = &h.state.booking;

    let (a, b) = tokio::join!(
        booking.reserve(bath_request(day(), 960, 1140), &op),
        booking.reserve(bath_request(day(), 960, 1140), &op),
    );

    let wins = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one of two identical requests may win");
    let loss = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(loss, AppError::Conflict(_)), "got {loss:?}");
}

#[tokio::test]
async fn test_lapsed_hold_blocks_confirmation() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    let booking = h
        .state
        .booking
        .reserve(bath_request(day(), 600, 780), &op)
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::PendingCall);
    assert!(booking.hold_until.is_some());

    // Callback hold is 360 minutes
    h.clock.advance_minutes(361);

    let err = h.state.booking.confirm(booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::HoldExpired(_)), "got {err:?}");

    let stored = h.state.booking.find(booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Expired);
    assert_eq!(stored.hold_until, None);
}

#[tokio::test]
async fn test_prepayment_stage_rearms_hold() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    let booking = h
        .state
        .booking
        .reserve(bath_request(day(), 600, 780), &op)
        .await
        .unwrap();

    h.clock.advance_minutes(100);
    let booking = h
        .state
        .booking
        .request_prepayment(booking.id)
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::AwaitingPrepayment);
    let rearmed = h.clock.now().timestamp_millis() + 2880 * 60_000;
    assert_eq!(booking.hold_until, Some(rearmed));

    let booking = h.state.booking.confirm(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.hold_until, None);
}

#[tokio::test]
async fn test_price_snapshot_survives_tariff_change() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    let booking = h
        .state
        .booking
        .reserve(bath_request(day(), 600, 780), &op)
        .await
        .unwrap();
    assert_eq!(booking.price.total, 5_000);

    // Reprice baths; the stored quote must not move
    let now = h.clock.now().timestamp_millis();
    h.state
        .store
        .upsert_tariff(Tariff {
            id: snowflake_id(),
            booking_type: BookingType::Bath,
            date: None,
            base: 9_000,
            threshold_guests: None,
            base_over_threshold: None,
            per_guest: false,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let confirmed = h.state.booking.confirm(booking.id).await.unwrap();
    assert_eq!(confirmed.price.total, 5_000);

    // New bookings see the new price
    let fresh = h
        .state
        .booking
        .reserve(bath_request(day(), 780, 960), &op)
        .await
        .unwrap();
    assert_eq!(fresh.price.total, 9_000);
}

#[tokio::test]
async fn test_expire_sweep_frees_window() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    let booking = h
        .state
        .booking
        .reserve(bath_request(day(), 600, 780), &op)
        .await
        .unwrap();

    h.clock.advance_minutes(361);
    let expired = h.state.booking.expire_lapsed_holds().await.unwrap();
    assert_eq!(expired, 1);

    let stored = h.state.booking.find(booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Expired);

    let slots = h.state.booking.availability("B1", day()).await.unwrap();
    let morning = slots.iter().find(|s| s.start_min == 600).unwrap();
    assert!(morning.available);

    h.state
        .booking
        .reserve(bath_request(day(), 600, 780), &op)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancel_returns_quads_to_pool() {
    let h = harness_at(moscow(2025, 6, 1, 12, 0)).await;
    let op = staff();

    let full = h
        .state
        .booking
        .reserve(quad_request(day(), 600, 720, 4), &op)
        .await
        .unwrap();
    let err = h
        .state
        .booking
        .reserve(quad_request(day(), 600, 720, 1), &op)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    h.state.booking.cancel(full.id).await.unwrap();

    // Slot is empty again, so the next booking is alone in it
    let fresh = h
        .state
        .booking
        .reserve(quad_request(day(), 600, 720, 4), &op)
        .await
        .unwrap();
    assert!(!fresh.proximity_discount);
    assert_eq!(fresh.price.total, 14_000);
}
