//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give more
//! meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::{ExchangeRate, Money};
use domain_settlement::{Invoice, Payment};

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than
/// tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts the conservation property on an invoice and its payment log
///
/// The invoice's paid buckets, expressed in USD, must equal the settled
/// totals of the currently-active payments, within `tolerance`.
pub fn assert_conservation(
    invoice: &Invoice,
    payments: &[Payment],
    rate: ExchangeRate,
    tolerance: Decimal,
) {
    let bucket_total =
        invoice.amount_paid_usd.amount() + invoice.amount_paid_local.to_usd(rate).amount();
    let active_total: Decimal = payments
        .iter()
        .filter(|p| p.is_active())
        .map(|p| p.settled_total_usd().amount())
        .sum();

    let diff = (bucket_total - active_total).abs();
    assert!(
        diff <= tolerance,
        "Conservation violated on invoice {}: buckets={}, active payments={}, diff={}",
        invoice.id,
        bucket_total,
        active_total,
        diff
    );
}
