//! Owner credit account
//!
//! A side-balance of prepaid USD an owner can use to offset any of their
//! invoices. The balance is drawn down and replenished only by the
//! settlement engine, atomically with the invoice update; top-ups happen
//! elsewhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{money::round_cents, CoreError, Currency, Money, OwnerId};

use crate::error::SettlementError;

/// An owner's prepaid credit balance, USD-denominated
///
/// The balance is private so the non-negativity invariant cannot be broken
/// from outside: a draw exceeding the balance is rejected, never clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerCreditAccount {
    /// Owner this balance belongs to
    pub owner_id: OwnerId,
    balance_usd: Money,
}

impl OwnerCreditAccount {
    /// Creates an account with an opening balance
    ///
    /// # Errors
    ///
    /// Returns a validation error if the opening balance is negative.
    pub fn new(owner_id: OwnerId, opening_balance: Decimal) -> Result<Self, CoreError> {
        if opening_balance.is_sign_negative() {
            return Err(CoreError::validation(format!(
                "credit balance must be non-negative, got {opening_balance}"
            )));
        }
        Ok(Self {
            owner_id,
            balance_usd: Money::new(round_cents(opening_balance), Currency::Usd),
        })
    }

    /// Current balance in USD
    pub fn balance_usd(&self) -> Money {
        self.balance_usd
    }

    /// Draws `amount` USD from the balance
    ///
    /// # Errors
    ///
    /// Returns `InsufficientCredit` when the draw exceeds the balance.
    pub(crate) fn draw(&mut self, amount: Money) -> Result<(), SettlementError> {
        if amount.amount() > self.balance_usd.amount() {
            return Err(SettlementError::InsufficientCredit {
                requested: amount.amount(),
                available: self.balance_usd.amount(),
            });
        }
        self.balance_usd = self.balance_usd - amount;
        Ok(())
    }

    /// Returns `amount` USD to the balance when a credit-funded payment is
    /// cancelled
    pub(crate) fn refund(&mut self, amount: Money) {
        self.balance_usd = self.balance_usd + amount;
    }
}
