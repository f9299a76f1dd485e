//! Settlement domain errors

use core_kernel::{Currency, InvoiceId, MoneyError, PaymentId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while settling or reversing a payment
///
/// Every variant is raised before any state is mutated; a failed operation
/// leaves the invoice, payment log, and credit account untouched.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Payment attempted on a canceled invoice
    #[error("Invoice {0} is canceled and accepts no further payments")]
    InvoiceClosed(InvoiceId),

    /// The request carries no value in any form
    #[error("Payment request carries no settleable value")]
    EmptyPayment,

    /// Credit draw exceeds the owner's balance
    #[error("Credit draw of {requested} USD exceeds available balance of {available} USD")]
    InsufficientCredit {
        requested: Decimal,
        available: Decimal,
    },

    /// A credit draw was requested but no credit account was supplied
    #[error("No owner credit account available for the requested credit draw")]
    CreditAccountMissing,

    /// A settled amount lacks a payment method reference
    #[error("A payment method is required to settle {amount} {currency}")]
    PaymentMethodRequired { amount: Decimal, currency: Currency },

    /// Cancelling a payment that is not active
    #[error("Payment {0} has already been cancelled")]
    AlreadyCancelled(PaymentId),

    /// The payment does not belong to the supplied invoice
    #[error("Payment {payment} does not belong to invoice {invoice}")]
    InvoiceMismatch {
        payment: PaymentId,
        invoice: InvoiceId,
    },

    /// Money-level failure, including non-positive exchange rates
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

/// Non-fatal notice that a paid bucket was clamped at zero
///
/// Emitted when reversing a payment would have driven a paid-amount bucket
/// below zero and the bucket was clamped instead. The operation still
/// completes; the warning is surfaced for operator investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationWarning {
    /// Invoice whose bucket was clamped
    pub invoice_id: InvoiceId,
    /// Which currency bucket was affected
    pub bucket: Currency,
    /// How far below zero the subtraction would have landed
    pub shortfall: Decimal,
}

impl fmt::Display for ReconciliationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reconciliation: clamped {} bucket of invoice {} (shortfall {})",
            self.bucket, self.invoice_id, self.shortfall
        )
    }
}
