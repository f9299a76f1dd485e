//! Invoice ledger entity
//!
//! An invoice accumulates paid amounts in two currency buckets and derives
//! its status from them. The buckets are mutated exclusively by the
//! settlement engine; everything else reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{
    money::round_cents, CoreError, Currency, ExchangeRate, InvoiceId, Money, OwnerId, PatientId,
};

/// Invoice status, derived from the paid amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Nothing paid yet
    Pending,
    /// Some, but not all, of the total has been settled
    Partial,
    /// Settled in full (within epsilon)
    Paid,
    /// Administratively canceled; terminal, refuses further payments
    Canceled,
}

/// An invoice for clinic services
///
/// `total` is fixed at creation; `amount_paid_usd` and `amount_paid_local`
/// are running totals adjusted only by the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Patient the services were rendered to
    pub patient_id: PatientId,
    /// Owner billed for the invoice, when known
    pub owner_id: Option<OwnerId>,
    /// Denomination of `total`
    pub currency: Currency,
    /// Invoice total in `currency`, immutable here
    pub total: Money,
    /// Rate frozen at issue for local-currency invoices, used for
    /// USD-equivalent reporting
    pub exchange_rate_at_issue: Option<ExchangeRate>,
    /// Running total of USD received (including credit draws)
    pub amount_paid_usd: Money,
    /// Running total of local currency received
    pub amount_paid_local: Money,
    /// Line items, read-only in this subsystem
    pub items: Vec<InvoiceItem>,
    /// Derived status
    pub status: InvoiceStatus,
    /// Free-text notes
    pub notes: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new pending invoice
    ///
    /// # Errors
    ///
    /// Returns a validation error if `total` is negative.
    pub fn new(
        patient_id: PatientId,
        currency: Currency,
        total: Decimal,
    ) -> Result<Self, CoreError> {
        if total.is_sign_negative() {
            return Err(CoreError::validation(format!(
                "invoice total must be non-negative, got {total}"
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: InvoiceId::new_v7(),
            patient_id,
            owner_id: None,
            currency,
            total: Money::new(round_cents(total), currency),
            exchange_rate_at_issue: None,
            amount_paid_usd: Money::zero(Currency::Usd),
            amount_paid_local: Money::zero(Currency::Local),
            items: Vec::new(),
            status: InvoiceStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets the billed owner
    pub fn with_owner(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Freezes the exchange rate in effect at issue
    pub fn with_rate_at_issue(mut self, rate: ExchangeRate) -> Self {
        self.exchange_rate_at_issue = Some(rate);
        self
    }

    /// Adds a line item
    pub fn with_item(mut self, item: InvoiceItem) -> Self {
        self.items.push(item);
        self
    }

    /// Returns true if the invoice has been administratively canceled
    pub fn is_canceled(&self) -> bool {
        self.status == InvoiceStatus::Canceled
    }

    /// Returns the rate to use for USD-equivalence on this invoice
    ///
    /// The rate frozen at issue wins when present; otherwise the supplied
    /// fallback. One rule, applied consistently across remaining-due, status
    /// derivation, and reporting.
    pub fn rate_in_effect(&self, fallback: ExchangeRate) -> ExchangeRate {
        self.exchange_rate_at_issue.unwrap_or(fallback)
    }

    /// The invoice total expressed in USD
    pub fn total_usd_equivalent(&self, fallback: ExchangeRate) -> Money {
        self.total.to_usd(self.rate_in_effect(fallback))
    }

    /// Everything paid so far, expressed in USD
    pub fn total_paid_usd_equivalent(&self, fallback: ExchangeRate) -> Money {
        self.amount_paid_usd + self.amount_paid_local.to_usd(self.rate_in_effect(fallback))
    }

    /// What remains due in USD; negative when overpaid
    pub fn remaining_due_usd(&self, fallback: ExchangeRate) -> Money {
        self.total_usd_equivalent(fallback) - self.total_paid_usd_equivalent(fallback)
    }

    /// Fraction of the total still unpaid, clamped to `[0, 1]`
    pub fn unpaid_fraction(&self, fallback: ExchangeRate) -> Decimal {
        let total = self.total_usd_equivalent(fallback).amount();
        if total.is_zero() {
            return Decimal::ZERO;
        }
        let paid = self.total_paid_usd_equivalent(fallback).amount();
        (Decimal::ONE - paid / total).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

/// A line item on an invoice
///
/// Line items are composed elsewhere; the settlement engine only reads them
/// for per-item debt reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item ID
    pub id: Uuid,
    /// Description of the service or product
    pub description: String,
    /// Unit cost in the invoice currency
    pub cost: Decimal,
    /// Quantity
    pub quantity: Decimal,
}

impl InvoiceItem {
    /// Creates a new line item
    pub fn new(description: impl Into<String>, cost: Decimal, quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            cost,
            quantity,
        }
    }

    /// Line total in the invoice currency
    pub fn line_total(&self) -> Decimal {
        self.cost * self.quantity
    }
}
