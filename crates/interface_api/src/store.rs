//! Settlement store port and in-memory adapter
//!
//! The engine assumes an external transactional store; this port is the seam
//! where that store plugs in. Each operation spans exactly one unit of
//! atomicity: one invoice, its owner credit account, and the new or modified
//! payment record.
//!
//! The in-memory adapter serializes every settlement mutation behind one
//! write lock, which satisfies the single-writer-per-invoice ordering the
//! engine requires: two concurrent payments against the same invoice cannot
//! both compute `remaining_due` from the same stale snapshot. A database
//! adapter would get the same guarantee from row-level locking or an
//! optimistic version check.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use core_kernel::{ExchangeRate, InvoiceId, PatientId, PaymentId};
use domain_settlement::{
    DebtSummary, Invoice, OwnerCreditAccount, Payment, PaymentRequest, Settlement,
    SettlementEngine, SettlementError,
};

/// Errors from the settlement store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

/// Port over the transactional store backing the settlement engine
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Applies a payment to an invoice inside one transaction
    async fn apply_payment(
        &self,
        invoice_id: InvoiceId,
        request: &PaymentRequest,
    ) -> Result<Settlement, StoreError>;

    /// Cancels a payment inside one transaction
    async fn cancel_payment(
        &self,
        payment_id: PaymentId,
        reason: Option<String>,
    ) -> Result<Settlement, StoreError>;

    /// Computes the outstanding-debt summary for a patient's invoices
    async fn debt_summary(
        &self,
        patient_id: PatientId,
        fallback_rate: ExchangeRate,
    ) -> Result<DebtSummary, StoreError>;

    /// Fetches an invoice by id
    async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, StoreError>;

    /// Seeds an invoice produced by the invoicing front office
    async fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError>;

    /// Seeds an owner credit account topped up elsewhere
    async fn insert_credit_account(&self, account: OwnerCreditAccount) -> Result<(), StoreError>;
}

#[derive(Default)]
struct StoreInner {
    invoices: HashMap<InvoiceId, Invoice>,
    payments: HashMap<PaymentId, Payment>,
    credit_accounts: HashMap<core_kernel::OwnerId, OwnerCreditAccount>,
}

/// In-memory settlement store
///
/// One write lock over the whole state; settlement mutations run under it
/// end to end, so they serialize.
pub struct MemoryStore {
    engine: SettlementEngine,
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            engine: SettlementEngine::new(),
            inner: RwLock::new(StoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementStore for MemoryStore {
    async fn apply_payment(
        &self,
        invoice_id: InvoiceId,
        request: &PaymentRequest,
    ) -> Result<Settlement, StoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let invoice = inner
            .invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Invoice",
                id: invoice_id.to_string(),
            })?;
        let credit_account = invoice
            .owner_id
            .and_then(|owner| inner.credit_accounts.get_mut(&owner));

        let settlement = self
            .engine
            .apply_payment(invoice, credit_account, request)?;
        inner
            .payments
            .insert(settlement.payment.id, settlement.payment.clone());

        Ok(settlement)
    }

    async fn cancel_payment(
        &self,
        payment_id: PaymentId,
        reason: Option<String>,
    ) -> Result<Settlement, StoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let payment = inner
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Payment",
                id: payment_id.to_string(),
            })?;
        let invoice = inner
            .invoices
            .get_mut(&payment.invoice_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Invoice",
                id: payment.invoice_id.to_string(),
            })?;
        let credit_account = invoice
            .owner_id
            .and_then(|owner| inner.credit_accounts.get_mut(&owner));

        let settlement =
            self.engine
                .cancel_payment(payment, invoice, credit_account, reason.as_deref())?;

        Ok(settlement)
    }

    async fn debt_summary(
        &self,
        patient_id: PatientId,
        fallback_rate: ExchangeRate,
    ) -> Result<DebtSummary, StoreError> {
        let guard = self.inner.read().await;
        let invoices: Vec<Invoice> = guard
            .invoices
            .values()
            .filter(|invoice| invoice.patient_id == patient_id)
            .cloned()
            .collect();

        Ok(self.engine.compute_debt_summary(&invoices, fallback_rate))
    }

    async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, StoreError> {
        let guard = self.inner.read().await;
        guard
            .invoices
            .get(&invoice_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Invoice",
                id: invoice_id.to_string(),
            })
    }

    async fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        self.inner.write().await.invoices.insert(invoice.id, invoice);
        Ok(())
    }

    async fn insert_credit_account(&self, account: OwnerCreditAccount) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .credit_accounts
            .insert(account.owner_id, account);
        Ok(())
    }
}
