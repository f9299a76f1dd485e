//! Validated payment requests
//!
//! A `PaymentRequest` gathers everything a caller proposes for one
//! settlement action and is validated wholesale before the engine mutates
//! anything, so invalid combinations are rejected structurally instead of
//! silently producing a zero-effect payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{money::round_cents, Currency, ExchangeRate, Money, PaymentMethodId};

use crate::credit::OwnerCreditAccount;
use crate::error::SettlementError;

/// A candidate payment, as gathered by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Currency of the tendered amount
    pub currency: Currency,
    /// Amount tendered in `currency`; zero for a credit-only payment
    pub amount: Decimal,
    /// Payment method reference, required whenever `amount > 0`
    pub payment_method: Option<PaymentMethodId>,
    /// Free-text reference
    pub reference: Option<String>,
    /// Exchange rate in effect for this payment
    pub exchange_rate: ExchangeRate,
    /// USD to draw from the owner's credit balance
    pub credit_requested: Decimal,
}

impl PaymentRequest {
    /// Creates a request tendering `amount` in `currency`
    pub fn new(currency: Currency, amount: Decimal, exchange_rate: ExchangeRate) -> Self {
        Self {
            currency,
            amount,
            payment_method: None,
            reference: None,
            exchange_rate,
            credit_requested: Decimal::ZERO,
        }
    }

    /// Creates a request funded entirely from the owner's credit balance
    pub fn credit_only(credit_requested: Decimal, exchange_rate: ExchangeRate) -> Self {
        Self {
            currency: Currency::Usd,
            amount: Decimal::ZERO,
            payment_method: None,
            reference: None,
            exchange_rate,
            credit_requested,
        }
    }

    /// Sets the payment method reference
    pub fn with_method(mut self, method: PaymentMethodId) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Sets the free-text reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Adds a credit draw on top of the tendered amount
    pub fn with_credit(mut self, credit_requested: Decimal) -> Self {
        self.credit_requested = credit_requested;
        self
    }

    /// The tendered amount as typed money, rounded to cents
    ///
    /// Persisted amounts carry two decimal places, so sub-cent input is
    /// rounded half-up here before it reaches a bucket or payment record.
    pub fn tendered(&self) -> Money {
        Money::new(round_cents(self.amount), self.currency)
    }

    /// The credit draw as typed money (always USD), rounded to cents
    pub fn credit(&self) -> Money {
        Money::new(round_cents(self.credit_requested), Currency::Usd)
    }

    /// Validates the request against the credit account, before any mutation
    ///
    /// # Errors
    ///
    /// - `EmptyPayment` when neither the amount nor the credit draw is
    ///   positive, or either is negative
    /// - `CreditAccountMissing` when credit is requested without an account
    /// - `InsufficientCredit` when the draw exceeds the balance
    /// - `PaymentMethodRequired` when a tendered amount lacks a method
    pub fn validate(
        &self,
        credit_account: Option<&OwnerCreditAccount>,
    ) -> Result<(), SettlementError> {
        if self.amount.is_sign_negative() || self.credit_requested.is_sign_negative() {
            return Err(SettlementError::EmptyPayment);
        }
        if self.amount.is_zero() && self.credit_requested.is_zero() {
            return Err(SettlementError::EmptyPayment);
        }

        if !self.credit_requested.is_zero() {
            let account = credit_account.ok_or(SettlementError::CreditAccountMissing)?;
            if self.credit_requested > account.balance_usd().amount() {
                return Err(SettlementError::InsufficientCredit {
                    requested: self.credit_requested,
                    available: account.balance_usd().amount(),
                });
            }
        }

        if !self.amount.is_zero() && self.payment_method.is_none() {
            return Err(SettlementError::PaymentMethodRequired {
                amount: self.amount,
                currency: self.currency,
            });
        }

        Ok(())
    }
}
