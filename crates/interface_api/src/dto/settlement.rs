//! Settlement DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Currency, ExchangeRate, PaymentMethodId};
use domain_settlement::{
    DebtSummary, Invoice, Payment, PaymentRequest, ReconciliationWarning, Settlement,
};

use crate::error::ApiError;

/// Body of `POST /invoices/{id}/payments`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPaymentBody {
    pub currency: Currency,
    pub amount: Decimal,
    pub payment_method_id: Option<PaymentMethodId>,
    #[validate(length(max = 500))]
    pub reference: Option<String>,
    pub exchange_rate: Decimal,
    pub credit_amount_used: Option<Decimal>,
}

impl ApplyPaymentBody {
    /// Converts the body into a validated domain request
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive exchange rate; the
    /// remaining validation happens wholesale in the engine.
    pub fn into_request(self) -> Result<PaymentRequest, ApiError> {
        let exchange_rate = ExchangeRate::new(self.exchange_rate)
            .map_err(|err| ApiError::Validation(err.to_string()))?;

        let mut request = PaymentRequest::new(self.currency, self.amount, exchange_rate);
        request.payment_method = self.payment_method_id;
        request.reference = self.reference;
        if let Some(credit) = self.credit_amount_used {
            request = request.with_credit(credit);
        }
        Ok(request)
    }
}

/// Body of `POST /payments/{id}/cancel`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelPaymentBody {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Response carrying the settled payment and the updated invoice
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub payment: Payment,
    pub invoice: Invoice,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ReconciliationWarning>,
}

impl From<Settlement> for SettlementResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            payment: settlement.payment,
            invoice: settlement.invoice,
            warnings: settlement.warnings,
        }
    }
}

/// Response of `GET /patients/{id}/debt-summary`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummaryResponse {
    pub total_debt: Decimal,
    pub invoices_count: usize,
    pub invoices: Vec<domain_settlement::InvoiceDebt>,
}

impl From<DebtSummary> for DebtSummaryResponse {
    fn from(summary: DebtSummary) -> Self {
        Self {
            total_debt: summary.total_debt_usd,
            invoices_count: summary.invoice_count,
            invoices: summary.invoices,
        }
    }
}
