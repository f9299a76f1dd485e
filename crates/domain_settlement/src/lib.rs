//! Settlement Domain - Invoice Payment Application and Reversal
//!
//! This crate implements the invoice settlement rules for the clinic back
//! office: how a payment - possibly split across USD and the local currency,
//! possibly drawn from an owner's standing credit balance, possibly partial -
//! is applied to an invoice, how the invoice's paid amounts and status are
//! derived from first principles, and how a previously-applied payment is
//! reversed without corrupting those derived values.
//!
//! # Invariants
//!
//! - Paid-amount buckets never go negative; credit balances never go negative
//! - Every validation failure aborts before any mutation
//! - A cancelled payment's monetary effect is reversed exactly once
//! - Status is always re-derived from the amounts, never trusted as stored
//!   truth on its own
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_settlement::{SettlementEngine, PaymentRequest};
//!
//! let engine = SettlementEngine::new();
//! let request = PaymentRequest::new(Currency::Usd, dec!(60), rate)
//!     .with_method(card_on_file);
//!
//! let settlement = engine.apply_payment(&mut invoice, None, &request)?;
//! assert_eq!(settlement.invoice.status, InvoiceStatus::Partial);
//! ```

pub mod credit;
pub mod engine;
pub mod error;
pub mod invoice;
pub mod payment;
pub mod rates;
pub mod request;

pub use credit::OwnerCreditAccount;
pub use engine::{derive_status, DebtSummary, InvoiceDebt, ItemDebt, Settlement, SettlementEngine};
pub use error::{ReconciliationWarning, SettlementError};
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use payment::{Payment, PaymentStatus};
pub use rates::{LayeredRateProvider, RateError, RateProvider, RateQuote, RateSource, StaticRateProvider};
pub use request::PaymentRequest;
