//! Payment record entity
//!
//! A payment is an immutable, append-only record of one settlement action.
//! It freezes the exchange rate and USD equivalence at application time and
//! transitions once, irreversibly, to `Cancelled`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, ExchangeRate, InvoiceId, Money, PaymentId, PaymentMethodId};

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The payment currently counts toward its invoice
    Active,
    /// The payment's effect has been reversed
    Cancelled,
}

/// A record of one settlement action against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Invoice this payment settles
    pub invoice_id: InvoiceId,
    /// Currency the settled amount was tendered in
    pub currency: Currency,
    /// Amount tendered, in `currency`; zero for a credit-only payment
    pub amount: Money,
    /// USD equivalence computed at application time and frozen
    pub amount_usd_equivalent: Money,
    /// The exchange rate snapshot frozen into this payment
    pub exchange_rate_used: ExchangeRate,
    /// USD drawn from the owner's credit balance as part of this payment
    pub credit_amount_used: Money,
    /// Payment method reference; absent only for credit-only payments
    pub payment_method: Option<PaymentMethodId>,
    /// Free-text reference (receipt number, transfer id, ...)
    pub reference: Option<String>,
    /// Informational overage when the payment exceeded the remaining due
    pub overage_usd: Option<Money>,
    /// Status
    pub status: PaymentStatus,
    /// When the payment was applied
    pub created_at: DateTime<Utc>,
    /// When the payment was cancelled, if ever
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Why the payment was cancelled
    pub cancelled_reason: Option<String>,
}

impl Payment {
    /// Returns true while the payment counts toward its invoice
    pub fn is_active(&self) -> bool {
        self.status == PaymentStatus::Active
    }

    /// Total settled value of this payment in USD: the converted tendered
    /// amount plus the credit draw
    pub fn settled_total_usd(&self) -> Money {
        self.amount_usd_equivalent + self.credit_amount_used
    }

    /// Marks the payment cancelled; called only by the settlement engine
    /// after the monetary reversal has been applied
    pub(crate) fn mark_cancelled(&mut self, reason: Option<String>, at: DateTime<Utc>) {
        self.status = PaymentStatus::Cancelled;
        self.cancelled_at = Some(at);
        self.cancelled_reason = reason;
    }
}
