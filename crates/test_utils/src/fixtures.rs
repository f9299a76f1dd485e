//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the
//! settlement system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use core_kernel::{Currency, ExchangeRate, Money, OwnerId, PatientId, PaymentMethodId};

/// The rate most scenario tests settle at: 40 Bs per USD
pub static STANDARD_RATE: Lazy<ExchangeRate> =
    Lazy::new(|| ExchangeRate::new(dec!(40)).expect("standard fixture rate"));

/// A plausible live market rate that differs from the standard one
pub static MARKET_RATE: Lazy<ExchangeRate> =
    Lazy::new(|| ExchangeRate::new(dec!(36.55)).expect("market fixture rate"));

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard invoice total
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::Usd)
    }

    /// A partial payment amount
    pub fn usd_60() -> Money {
        Money::new(dec!(60.00), Currency::Usd)
    }

    /// A local-currency amount worth 50 USD at the standard rate
    pub fn bs_2000() -> Money {
        Money::new(dec!(2000.00), Currency::Local)
    }

    /// A zero USD amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::Usd)
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn patient_id() -> PatientId {
        PatientId::new()
    }

    pub fn owner_id() -> OwnerId {
        OwnerId::new()
    }

    pub fn payment_method_id() -> PaymentMethodId {
        PaymentMethodId::new()
    }
}
