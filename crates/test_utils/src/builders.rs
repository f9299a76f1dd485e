//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, ExchangeRate, OwnerId, PatientId, PaymentMethodId};
use domain_settlement::{Invoice, InvoiceItem, OwnerCreditAccount, PaymentRequest};

use crate::fixtures::{IdFixtures, STANDARD_RATE};

/// Builder for constructing test invoices
pub struct TestInvoiceBuilder {
    patient_id: PatientId,
    owner_id: Option<OwnerId>,
    currency: Currency,
    total: Decimal,
    rate_at_issue: Option<ExchangeRate>,
    items: Vec<InvoiceItem>,
}

impl Default for TestInvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInvoiceBuilder {
    /// Creates a builder for a 100 USD invoice with no owner or items
    pub fn new() -> Self {
        Self {
            patient_id: IdFixtures::patient_id(),
            owner_id: None,
            currency: Currency::Usd,
            total: dec!(100),
            rate_at_issue: None,
            items: Vec::new(),
        }
    }

    /// Sets the patient
    pub fn with_patient(mut self, patient_id: PatientId) -> Self {
        self.patient_id = patient_id;
        self
    }

    /// Sets the billed owner
    pub fn with_owner(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the total and its currency
    pub fn with_total(mut self, total: Decimal, currency: Currency) -> Self {
        self.total = total;
        self.currency = currency;
        self
    }

    /// Freezes the issue rate
    pub fn with_rate_at_issue(mut self, rate: ExchangeRate) -> Self {
        self.rate_at_issue = Some(rate);
        self
    }

    /// Adds a line item
    pub fn with_item(mut self, description: &str, cost: Decimal, quantity: Decimal) -> Self {
        self.items.push(InvoiceItem::new(description, cost, quantity));
        self
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(self.patient_id, self.currency, self.total)
            .expect("test invoice total must be valid");
        invoice.owner_id = self.owner_id;
        invoice.exchange_rate_at_issue = self.rate_at_issue;
        invoice.items = self.items;
        invoice
    }
}

/// Builder for constructing test payment requests
pub struct TestPaymentRequestBuilder {
    currency: Currency,
    amount: Decimal,
    method: Option<PaymentMethodId>,
    reference: Option<String>,
    exchange_rate: ExchangeRate,
    credit: Decimal,
}

impl Default for TestPaymentRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPaymentRequestBuilder {
    /// Creates a builder for a 60 USD card payment at the standard rate
    pub fn new() -> Self {
        Self {
            currency: Currency::Usd,
            amount: dec!(60),
            method: Some(IdFixtures::payment_method_id()),
            reference: None,
            exchange_rate: *STANDARD_RATE,
            credit: Decimal::ZERO,
        }
    }

    /// Sets the tendered amount and currency
    pub fn with_amount(mut self, amount: Decimal, currency: Currency) -> Self {
        self.amount = amount;
        self.currency = currency;
        self
    }

    /// Removes the payment method
    pub fn without_method(mut self) -> Self {
        self.method = None;
        self
    }

    /// Sets the free-text reference
    pub fn with_reference(mut self, reference: &str) -> Self {
        self.reference = Some(reference.to_string());
        self
    }

    /// Sets the exchange rate
    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.exchange_rate = rate;
        self
    }

    /// Sets the credit draw
    pub fn with_credit(mut self, credit: Decimal) -> Self {
        self.credit = credit;
        self
    }

    /// Builds the request
    pub fn build(self) -> PaymentRequest {
        let mut request = PaymentRequest::new(self.currency, self.amount, self.exchange_rate);
        request.payment_method = self.method;
        request.reference = self.reference;
        request.credit_requested = self.credit;
        request
    }
}

/// Creates a credit account with the given balance
pub fn credit_account(owner_id: OwnerId, balance: Decimal) -> OwnerCreditAccount {
    OwnerCreditAccount::new(owner_id, balance).expect("test credit balance must be valid")
}
