//! Settlement engine
//!
//! All invariants of the settlement subsystem are enforced here: payments
//! are validated wholesale before any mutation, applied atomically against
//! the invoice, the payment log, and the owner credit account, and reversed
//! as an exact inverse. Status is always re-derived from the amounts.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{money::round_cents, Currency, ExchangeRate, InvoiceId, Money, PaymentId, EPSILON_USD};

use crate::credit::OwnerCreditAccount;
use crate::error::{ReconciliationWarning, SettlementError};
use crate::invoice::{Invoice, InvoiceStatus};
use crate::payment::{Payment, PaymentStatus};
use crate::request::PaymentRequest;

/// Outcome of a settlement operation
///
/// Carries the affected payment, a snapshot of the updated invoice, and any
/// reconciliation warnings raised along the way. Warnings never fail the
/// operation.
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    /// The created or cancelled payment
    pub payment: Payment,
    /// The invoice after the operation
    pub invoice: Invoice,
    /// Non-fatal reconciliation notices
    pub warnings: Vec<ReconciliationWarning>,
}

/// Derives an invoice's status from its amounts
///
/// Pure; re-run every time money changes rather than trusting the stored
/// status. `Canceled` is terminal regardless of payments. The comparison is
/// clinic-favorable: a paid total within epsilon of the invoice total counts
/// as `Paid`, so rounding noise cannot leave an invoice perpetually
/// almost-paid.
pub fn derive_status(invoice: &Invoice, fallback_rate: ExchangeRate) -> InvoiceStatus {
    if invoice.is_canceled() {
        return InvoiceStatus::Canceled;
    }

    let paid = invoice.total_paid_usd_equivalent(fallback_rate).amount();
    let total = invoice.total_usd_equivalent(fallback_rate).amount();

    if paid >= total - EPSILON_USD {
        InvoiceStatus::Paid
    } else if paid > Decimal::ZERO {
        // Any recorded cent reads Partial; Pending means no payment at all,
        // epsilon tolerance applies only on the Paid side.
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Pending
    }
}

/// The settlement engine
///
/// Stateless; every operation takes the entities it touches. The caller's
/// transaction is the unit of atomicity: one invoice, its owner credit
/// account, and the new or modified payment record together.
#[derive(Debug, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    /// Creates a new settlement engine
    pub fn new() -> Self {
        Self
    }

    /// Applies a payment to an invoice
    ///
    /// Validation happens entirely before mutation, so a failure leaves the
    /// invoice and credit account untouched. Overpayment is accepted and
    /// flagged on the resulting payment rather than rejected; refund policy
    /// belongs to the caller.
    ///
    /// # Errors
    ///
    /// - `InvoiceClosed` when the invoice is canceled
    /// - `EmptyPayment`, `CreditAccountMissing`, `InsufficientCredit`,
    ///   `PaymentMethodRequired` per request validation
    pub fn apply_payment(
        &self,
        invoice: &mut Invoice,
        credit_account: Option<&mut OwnerCreditAccount>,
        request: &PaymentRequest,
    ) -> Result<Settlement, SettlementError> {
        if invoice.is_canceled() {
            return Err(SettlementError::InvoiceClosed(invoice.id));
        }
        request.validate(credit_account.as_deref())?;

        let tendered = request.tendered();
        let credit = request.credit();
        let amount_usd_equivalent = tendered.to_usd(request.exchange_rate);

        // Overage detection against a consistent snapshot of the remaining due.
        let remaining_due = invoice.remaining_due_usd(request.exchange_rate).amount();
        let requested_total_usd = amount_usd_equivalent.amount() + credit.amount();
        let overage_usd = if requested_total_usd > remaining_due + EPSILON_USD {
            Some(Money::new(
                round_cents(requested_total_usd - remaining_due),
                Currency::Usd,
            ))
        } else {
            None
        };

        // Validation already covered the credit draw, so these cannot fail.
        if !credit.is_zero() {
            let account = credit_account.ok_or(SettlementError::CreditAccountMissing)?;
            account.draw(credit)?;
        }

        match request.currency {
            Currency::Usd => invoice.amount_paid_usd = invoice.amount_paid_usd + tendered,
            Currency::Local => invoice.amount_paid_local = invoice.amount_paid_local + tendered,
        }
        // Credit is USD-denominated by definition, whatever the tendered currency.
        invoice.amount_paid_usd = invoice.amount_paid_usd + credit;

        let now = Utc::now();
        let payment = Payment {
            id: PaymentId::new_v7(),
            invoice_id: invoice.id,
            currency: request.currency,
            amount: tendered,
            amount_usd_equivalent,
            exchange_rate_used: request.exchange_rate,
            credit_amount_used: credit,
            payment_method: request.payment_method,
            reference: request.reference.clone(),
            overage_usd,
            status: PaymentStatus::Active,
            created_at: now,
            cancelled_at: None,
            cancelled_reason: None,
        };

        invoice.status = derive_status(invoice, request.exchange_rate);
        invoice.updated_at = now;

        tracing::info!(
            invoice = %invoice.id,
            payment = %payment.id,
            settled_usd = %payment.settled_total_usd().amount(),
            status = ?invoice.status,
            "applied payment"
        );

        Ok(Settlement {
            payment,
            invoice: invoice.clone(),
            warnings: Vec::new(),
        })
    }

    /// Cancels an active payment, reversing exactly its effect
    ///
    /// Subtraction never drives a paid bucket below zero: rounding drift is
    /// clamped and surfaced as a `ReconciliationWarning` while the operation
    /// still completes.
    ///
    /// # Errors
    ///
    /// - `AlreadyCancelled` when the payment is not active
    /// - `InvoiceMismatch` when the payment belongs to another invoice
    /// - `CreditAccountMissing` when the payment drew credit and no account
    ///   was supplied
    pub fn cancel_payment(
        &self,
        payment: &mut Payment,
        invoice: &mut Invoice,
        credit_account: Option<&mut OwnerCreditAccount>,
        reason: Option<&str>,
    ) -> Result<Settlement, SettlementError> {
        if payment.invoice_id != invoice.id {
            return Err(SettlementError::InvoiceMismatch {
                payment: payment.id,
                invoice: invoice.id,
            });
        }
        if !payment.is_active() {
            return Err(SettlementError::AlreadyCancelled(payment.id));
        }
        if !payment.credit_amount_used.is_zero() && credit_account.is_none() {
            return Err(SettlementError::CreditAccountMissing);
        }

        let mut warnings = Vec::new();

        match payment.currency {
            Currency::Usd => subtract_clamped(
                invoice.id,
                &mut invoice.amount_paid_usd,
                payment.amount,
                &mut warnings,
            ),
            Currency::Local => subtract_clamped(
                invoice.id,
                &mut invoice.amount_paid_local,
                payment.amount,
                &mut warnings,
            ),
        }
        subtract_clamped(
            invoice.id,
            &mut invoice.amount_paid_usd,
            payment.credit_amount_used,
            &mut warnings,
        );

        if !payment.credit_amount_used.is_zero() {
            if let Some(account) = credit_account {
                account.refund(payment.credit_amount_used);
            }
        }

        let now = Utc::now();
        payment.mark_cancelled(reason.map(str::to_owned), now);
        invoice.status = derive_status(invoice, payment.exchange_rate_used);
        invoice.updated_at = now;

        tracing::info!(
            invoice = %invoice.id,
            payment = %payment.id,
            reason = reason.unwrap_or("-"),
            status = ?invoice.status,
            "cancelled payment"
        );

        Ok(Settlement {
            payment: payment.clone(),
            invoice: invoice.clone(),
            warnings,
        })
    }

    /// Aggregates outstanding debt across a set of invoices
    ///
    /// Pure read-side reporting, safe to recompute on every read. Canceled
    /// and settled invoices contribute nothing; per-item remaining amounts
    /// scale each line by the invoice's unpaid fraction.
    pub fn compute_debt_summary(
        &self,
        invoices: &[Invoice],
        fallback_rate: ExchangeRate,
    ) -> DebtSummary {
        let mut entries = Vec::new();
        let mut total_debt_usd = Decimal::ZERO;

        for invoice in invoices {
            if invoice.is_canceled() {
                continue;
            }

            let remaining = invoice
                .remaining_due_usd(fallback_rate)
                .amount()
                .max(Decimal::ZERO);
            let remaining = round_cents(remaining);
            if remaining <= EPSILON_USD {
                continue;
            }

            let fraction = invoice.unpaid_fraction(fallback_rate);
            let rate = invoice.rate_in_effect(fallback_rate);
            let items = invoice
                .items
                .iter()
                .map(|item| ItemDebt {
                    description: item.description.clone(),
                    remaining_usd: round_cents(
                        Money::new(item.line_total(), invoice.currency)
                            .to_usd(rate)
                            .amount()
                            * fraction,
                    ),
                })
                .collect();

            total_debt_usd += remaining;
            entries.push(InvoiceDebt {
                invoice_id: invoice.id,
                status: invoice.status,
                remaining_usd: remaining,
                unpaid_fraction: fraction,
                items,
            });
        }

        DebtSummary {
            total_debt_usd,
            invoice_count: entries.len(),
            invoices: entries,
        }
    }
}

/// Subtracts from a paid bucket, clamping at zero with a warning
///
/// A clamp only fires when the bucket has drifted out of step with the
/// payment log.
fn subtract_clamped(
    invoice_id: InvoiceId,
    bucket: &mut Money,
    amount: Money,
    warnings: &mut Vec<ReconciliationWarning>,
) {
    if amount.is_zero() {
        return;
    }
    let next = *bucket - amount;
    if next.is_negative() {
        let warning = ReconciliationWarning {
            invoice_id,
            bucket: bucket.currency(),
            shortfall: next.amount().abs(),
        };
        tracing::warn!(%warning, "paid bucket clamped to zero during cancellation");
        warnings.push(warning);
        *bucket = Money::zero(bucket.currency());
    } else {
        *bucket = next;
    }
}

/// Aggregated outstanding debt for a set of invoices
#[derive(Debug, Clone, Serialize)]
pub struct DebtSummary {
    /// Sum of the per-invoice remaining amounts, USD
    pub total_debt_usd: Decimal,
    /// Number of invoices with outstanding debt
    pub invoice_count: usize,
    /// Per-invoice breakdown
    pub invoices: Vec<InvoiceDebt>,
}

/// Outstanding debt on one invoice
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDebt {
    /// Invoice identifier
    pub invoice_id: InvoiceId,
    /// Invoice status at computation time
    pub status: InvoiceStatus,
    /// Remaining due in USD, clamped to zero on overpayment
    pub remaining_usd: Decimal,
    /// Fraction of the total still unpaid, in `[0, 1]`
    pub unpaid_fraction: Decimal,
    /// Per-item remaining amounts
    pub items: Vec<ItemDebt>,
}

/// Remaining amount attributable to one line item
#[derive(Debug, Clone, Serialize)]
pub struct ItemDebt {
    /// Item description
    pub description: String,
    /// Item cost scaled by the invoice's unpaid fraction, USD
    pub remaining_usd: Decimal,
}
