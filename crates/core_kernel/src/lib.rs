//! Core Kernel - Foundational types for the clinic settlement system
//!
//! This crate provides the fundamental building blocks used across the
//! settlement domain and interface layers:
//! - Money types with precise decimal arithmetic for the two clinic currencies
//! - Exchange rate value types for USD-equivalence conversion
//! - Strongly-typed identifiers

pub mod error;
pub mod identifiers;
pub mod money;

pub use error::CoreError;
pub use identifiers::{InvoiceId, OwnerId, PatientId, PaymentId, PaymentMethodId};
pub use money::{Currency, ExchangeRate, Money, MoneyError, EPSILON_USD};
