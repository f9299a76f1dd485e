//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values for the
//! two currencies the clinic bills in: US dollars and the local currency
//! ("Bs"). All arithmetic uses rust_decimal; amounts are only rounded to two
//! decimal places when they cross a currency boundary, never earlier.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// Tolerance for near-equal monetary comparisons, in USD.
///
/// Amounts within one cent of each other are treated as equal so that
/// rounding residue from cross-currency conversion never leaves an invoice
/// perpetually almost-paid.
pub const EPSILON_USD: Decimal = dec!(0.01);

/// The currencies an invoice or payment can be denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollars
    Usd,
    /// The local currency ("Bs")
    Local,
}

impl Currency {
    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Local => "Bs",
        }
    }

    /// Returns the wire code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Local => "LOCAL",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid exchange rate: {0} (must be positive)")]
    InvalidRate(Decimal),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// An exchange rate expressed as units of local currency per one USD
///
/// The constructor rejects non-positive values, so a held `ExchangeRate` is
/// always safe to divide by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Creates an exchange rate, rejecting zero and negative values
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::InvalidRate(value));
        }
        Ok(Self(value))
    }

    /// Returns the rate as a decimal (Bs per USD)
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Decimal {
        rate.0
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Bs/USD", self.0)
    }
}

/// Rounds an amount to two decimal places using round-half-up
///
/// Applied at currency boundaries and at persistence points only, so that
/// intermediate sums stay exact.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A monetary amount with its currency
///
/// Arithmetic between mismatched currencies is rejected; conversion between
/// USD and Bs is explicit and takes the exchange rate to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates Money from an integer amount of cents
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, 2), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs(), self.currency)
    }

    /// Rounds to two decimal places, round-half-up
    pub fn round_to_cents(&self) -> Self {
        Self {
            amount: round_cents(self.amount),
            currency: self.currency,
        }
    }

    /// Converts this amount to USD using the supplied rate
    ///
    /// USD amounts pass through untouched; Bs amounts are divided by the rate
    /// and rounded at the boundary.
    pub fn to_usd(&self, rate: ExchangeRate) -> Money {
        match self.currency {
            Currency::Usd => *self,
            Currency::Local => Money {
                amount: round_cents(self.amount / rate.value()),
                currency: Currency::Usd,
            },
        }
    }

    /// Converts this amount to the local currency using the supplied rate
    pub fn to_local(&self, rate: ExchangeRate) -> Money {
        match self.currency {
            Currency::Local => *self,
            Currency::Usd => Money {
                amount: round_cents(self.amount * rate.value()),
                currency: Currency::Local,
            },
        }
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Returns true if two same-currency amounts differ by at most epsilon
    pub fn approx_eq(&self, other: &Money) -> bool {
        self.currency == other.currency && (self.amount - other.amount).abs() <= EPSILON_USD
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency.symbol(), self.amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}
