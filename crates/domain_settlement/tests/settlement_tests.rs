//! Comprehensive tests for domain_settlement

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, ExchangeRate, Money, OwnerId, PatientId, PaymentMethodId};

use domain_settlement::{
    derive_status, Invoice, InvoiceItem, InvoiceStatus, OwnerCreditAccount, PaymentRequest,
    PaymentStatus, SettlementEngine, SettlementError,
};

fn rate(value: Decimal) -> ExchangeRate {
    ExchangeRate::new(value).unwrap()
}

fn usd_invoice(total: Decimal) -> Invoice {
    Invoice::new(PatientId::new(), Currency::Usd, total).unwrap()
}

fn bs_invoice(total: Decimal, issue_rate: Decimal) -> Invoice {
    Invoice::new(PatientId::new(), Currency::Local, total)
        .unwrap()
        .with_rate_at_issue(rate(issue_rate))
}

fn method() -> PaymentMethodId {
    PaymentMethodId::new()
}

// ============================================================================
// Scenario tests
// ============================================================================

mod scenarios {
    use super::*;

    /// Scenario A: 60 of 100 USD paid via a method -> Partial
    #[test]
    fn test_partial_usd_payment() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(60), rate(dec!(40)))
            .with_method(method());
        let settlement = engine.apply_payment(&mut invoice, None, &request).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(60));
        assert_eq!(settlement.payment.status, PaymentStatus::Active);
        assert!(settlement.payment.overage_usd.is_none());
        assert!(settlement.warnings.is_empty());
    }

    /// Scenario B: the remaining 40 USD completes the invoice -> Paid
    #[test]
    fn test_second_payment_settles_in_full() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let first = PaymentRequest::new(Currency::Usd, dec!(60), rate(dec!(40)))
            .with_method(method());
        engine.apply_payment(&mut invoice, None, &first).unwrap();

        let second = PaymentRequest::new(Currency::Usd, dec!(40), rate(dec!(40)))
            .with_method(method());
        engine.apply_payment(&mut invoice, None, &second).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(100));
    }

    /// Scenario C: credit alone settles the invoice, no method required
    #[test]
    fn test_credit_only_payment() {
        let engine = SettlementEngine::new();
        let owner = OwnerId::new();
        let mut invoice = usd_invoice(dec!(50)).with_owner(owner);
        let mut account = OwnerCreditAccount::new(owner, dec!(50)).unwrap();

        let request = PaymentRequest::credit_only(dec!(50), rate(dec!(40)));
        let settlement = engine
            .apply_payment(&mut invoice, Some(&mut account), &request)
            .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(account.balance_usd().is_zero());
        assert!(settlement.payment.payment_method.is_none());
        assert_eq!(settlement.payment.credit_amount_used.amount(), dec!(50));
        // The credit draw lands on the USD bucket.
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(50));
    }

    /// Scenario D: 2000 Bs at rate 40 equals 50 USD on a 100 USD invoice
    #[test]
    fn test_local_currency_payment_is_partial() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Local, dec!(2000), rate(dec!(40)))
            .with_method(method());
        let settlement = engine.apply_payment(&mut invoice, None, &request).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(invoice.amount_paid_local.amount(), dec!(2000));
        assert_eq!(
            settlement.payment.amount_usd_equivalent,
            Money::new(dec!(50.00), Currency::Usd)
        );
    }

    /// Scenario E: cancelling the settling payment reverts to Partial
    #[test]
    fn test_cancellation_reverts_status() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let first = PaymentRequest::new(Currency::Usd, dec!(60), rate(dec!(40)))
            .with_method(method());
        engine.apply_payment(&mut invoice, None, &first).unwrap();

        let second = PaymentRequest::new(Currency::Usd, dec!(40), rate(dec!(40)))
            .with_method(method());
        let mut payment = engine
            .apply_payment(&mut invoice, None, &second)
            .unwrap()
            .payment;

        let settlement = engine
            .cancel_payment(&mut payment, &mut invoice, None, Some("duplicate"))
            .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(60));
        assert_eq!(payment.status, PaymentStatus::Cancelled);
        assert_eq!(payment.cancelled_reason.as_deref(), Some("duplicate"));
        assert!(payment.cancelled_at.is_some());
        assert!(settlement.warnings.is_empty());
    }

    /// Scenario F: overdrawing credit fails and changes nothing
    #[test]
    fn test_insufficient_credit_leaves_state_untouched() {
        let engine = SettlementEngine::new();
        let owner = OwnerId::new();
        let mut invoice = usd_invoice(dec!(100)).with_owner(owner);
        let mut account = OwnerCreditAccount::new(owner, dec!(50)).unwrap();

        let request = PaymentRequest::credit_only(dec!(60), rate(dec!(40)));
        let result = engine.apply_payment(&mut invoice, Some(&mut account), &request);

        assert!(matches!(
            result,
            Err(SettlementError::InsufficientCredit {
                requested,
                available,
            }) if requested == dec!(60) && available == dec!(50)
        ));
        assert_eq!(account.balance_usd().amount(), dec!(50));
        assert!(invoice.amount_paid_usd.is_zero());
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }
}

// ============================================================================
// Validation tests
// ============================================================================

mod validation {
    use super::*;

    #[test]
    fn test_canceled_invoice_refuses_payment() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));
        invoice.status = InvoiceStatus::Canceled;

        let request = PaymentRequest::new(Currency::Usd, dec!(10), rate(dec!(40)))
            .with_method(method());
        let result = engine.apply_payment(&mut invoice, None, &request);

        assert!(matches!(result, Err(SettlementError::InvoiceClosed(_))));
        assert!(invoice.amount_paid_usd.is_zero());
    }

    #[test]
    fn test_zero_value_request_is_rejected() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(0), rate(dec!(40)));
        assert!(matches!(
            engine.apply_payment(&mut invoice, None, &request),
            Err(SettlementError::EmptyPayment)
        ));
    }

    #[test]
    fn test_tendered_amount_without_method_is_rejected() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(10), rate(dec!(40)));
        assert!(matches!(
            engine.apply_payment(&mut invoice, None, &request),
            Err(SettlementError::PaymentMethodRequired { .. })
        ));
    }

    #[test]
    fn test_credit_draw_without_account_is_rejected() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::credit_only(dec!(10), rate(dec!(40)));
        assert!(matches!(
            engine.apply_payment(&mut invoice, None, &request),
            Err(SettlementError::CreditAccountMissing)
        ));
    }

    #[test]
    fn test_sub_cent_amounts_are_rounded_before_persisting() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(10.005), rate(dec!(40)))
            .with_method(method());
        let settlement = engine.apply_payment(&mut invoice, None, &request).unwrap();

        // Half-up to cents everywhere the amount lands.
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(10.01));
        assert_eq!(settlement.payment.amount.amount(), dec!(10.01));
        assert_eq!(settlement.payment.amount_usd_equivalent.amount(), dec!(10.01));
    }

    #[test]
    fn test_mixed_tender_and_credit_in_one_payment() {
        let engine = SettlementEngine::new();
        let owner = OwnerId::new();
        let mut invoice = usd_invoice(dec!(100)).with_owner(owner);
        let mut account = OwnerCreditAccount::new(owner, dec!(30)).unwrap();

        let request = PaymentRequest::new(Currency::Usd, dec!(70), rate(dec!(40)))
            .with_method(method())
            .with_credit(dec!(30));
        engine
            .apply_payment(&mut invoice, Some(&mut account), &request)
            .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(100));
        assert!(account.balance_usd().is_zero());
    }
}

// ============================================================================
// Overpayment tests
// ============================================================================

mod overpayment {
    use super::*;

    #[test]
    fn test_overpayment_is_accepted_and_flagged() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(120), rate(dec!(40)))
            .with_method(method());
        let settlement = engine.apply_payment(&mut invoice, None, &request).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(120));
        assert_eq!(
            settlement.payment.overage_usd,
            Some(Money::new(dec!(20.00), Currency::Usd))
        );
    }

    #[test]
    fn test_one_cent_residue_is_not_flagged() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(100.01), rate(dec!(40)))
            .with_method(method());
        let settlement = engine.apply_payment(&mut invoice, None, &request).unwrap();

        assert!(settlement.payment.overage_usd.is_none());
    }
}

// ============================================================================
// Cancellation tests
// ============================================================================

mod cancellation {
    use super::*;

    #[test]
    fn test_double_cancellation_is_rejected_and_idempotent() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(60), rate(dec!(40)))
            .with_method(method());
        let mut payment = engine
            .apply_payment(&mut invoice, None, &request)
            .unwrap()
            .payment;

        engine
            .cancel_payment(&mut payment, &mut invoice, None, None)
            .unwrap();
        let after_first = invoice.clone();

        let second = engine.cancel_payment(&mut payment, &mut invoice, None, None);
        assert!(matches!(second, Err(SettlementError::AlreadyCancelled(_))));

        // The failed second cancellation changed nothing.
        assert_eq!(invoice.amount_paid_usd, after_first.amount_paid_usd);
        assert_eq!(invoice.amount_paid_local, after_first.amount_paid_local);
        assert_eq!(invoice.status, after_first.status);
    }

    #[test]
    fn test_round_trip_restores_state_exactly() {
        let engine = SettlementEngine::new();
        let owner = OwnerId::new();
        let mut invoice = bs_invoice(dec!(4000), dec!(40)).with_owner(owner);
        let mut account = OwnerCreditAccount::new(owner, dec!(25)).unwrap();

        let before_invoice = invoice.clone();
        let before_balance = account.balance_usd();

        let request = PaymentRequest::new(Currency::Local, dec!(1000), rate(dec!(40)))
            .with_method(method())
            .with_credit(dec!(25));
        let mut payment = engine
            .apply_payment(&mut invoice, Some(&mut account), &request)
            .unwrap()
            .payment;

        engine
            .cancel_payment(&mut payment, &mut invoice, Some(&mut account), None)
            .unwrap();

        assert_eq!(invoice.amount_paid_usd, before_invoice.amount_paid_usd);
        assert_eq!(invoice.amount_paid_local, before_invoice.amount_paid_local);
        assert_eq!(invoice.status, before_invoice.status);
        assert_eq!(account.balance_usd(), before_balance);
    }

    #[test]
    fn test_cancelling_credit_payment_without_account_is_rejected() {
        let engine = SettlementEngine::new();
        let owner = OwnerId::new();
        let mut invoice = usd_invoice(dec!(50)).with_owner(owner);
        let mut account = OwnerCreditAccount::new(owner, dec!(50)).unwrap();

        let request = PaymentRequest::credit_only(dec!(50), rate(dec!(40)));
        let mut payment = engine
            .apply_payment(&mut invoice, Some(&mut account), &request)
            .unwrap()
            .payment;

        let result = engine.cancel_payment(&mut payment, &mut invoice, None, None);
        assert!(matches!(result, Err(SettlementError::CreditAccountMissing)));
        assert!(payment.is_active());
        assert_eq!(invoice.amount_paid_usd.amount(), dec!(50));
    }

    #[test]
    fn test_cancelling_against_wrong_invoice_is_rejected() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));
        let mut other = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(10), rate(dec!(40)))
            .with_method(method());
        let mut payment = engine
            .apply_payment(&mut invoice, None, &request)
            .unwrap()
            .payment;

        let result = engine.cancel_payment(&mut payment, &mut other, None, None);
        assert!(matches!(result, Err(SettlementError::InvoiceMismatch { .. })));
    }

    #[test]
    fn test_drifted_bucket_is_clamped_with_warning() {
        let engine = SettlementEngine::new();
        let mut invoice = usd_invoice(dec!(100));

        let request = PaymentRequest::new(Currency::Usd, dec!(60), rate(dec!(40)))
            .with_method(method());
        let mut payment = engine
            .apply_payment(&mut invoice, None, &request)
            .unwrap()
            .payment;

        // Simulate external drift: the bucket no longer covers the payment.
        invoice.amount_paid_usd = Money::new(dec!(59.99), Currency::Usd);

        let settlement = engine
            .cancel_payment(&mut payment, &mut invoice, None, None)
            .unwrap();

        assert!(invoice.amount_paid_usd.is_zero());
        assert_eq!(settlement.warnings.len(), 1);
        assert_eq!(settlement.warnings[0].shortfall, dec!(0.01));
        assert_eq!(payment.status, PaymentStatus::Cancelled);
    }
}

// ============================================================================
// Conservation and mixed-currency tests
// ============================================================================

mod conservation {
    use super::*;

    fn active_settled_total(payments: &[domain_settlement::Payment]) -> Decimal {
        payments
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.settled_total_usd().amount())
            .sum()
    }

    #[test]
    fn test_buckets_match_active_payments_after_mixed_sequence() {
        let engine = SettlementEngine::new();
        let owner = OwnerId::new();
        let r = rate(dec!(40));
        let mut invoice = usd_invoice(dec!(500)).with_owner(owner);
        let mut account = OwnerCreditAccount::new(owner, dec!(100)).unwrap();
        let mut payments = Vec::new();

        let requests = [
            PaymentRequest::new(Currency::Usd, dec!(120), r).with_method(method()),
            PaymentRequest::new(Currency::Local, dec!(2000), r).with_method(method()),
            PaymentRequest::credit_only(dec!(60), r),
            PaymentRequest::new(Currency::Local, dec!(1500), r)
                .with_method(method())
                .with_credit(dec!(40)),
        ];
        for request in &requests {
            let settlement = engine
                .apply_payment(&mut invoice, Some(&mut account), request)
                .unwrap();
            payments.push(settlement.payment);
        }

        // Cancel the second and fourth payments.
        for index in [1, 3] {
            let mut payment = payments[index].clone();
            engine
                .cancel_payment(&mut payment, &mut invoice, Some(&mut account), None)
                .unwrap();
            payments[index] = payment;
        }

        let bucket_total_usd = invoice.amount_paid_usd.amount()
            + invoice.amount_paid_local.to_usd(r).amount();
        assert_eq!(bucket_total_usd, active_settled_total(&payments));

        // Credit refunds landed back on the account: 100 - 60 = 40 held.
        assert_eq!(account.balance_usd().amount(), dec!(40));
    }

    #[test]
    fn test_paid_equivalent_is_monotone_under_apply() {
        let engine = SettlementEngine::new();
        let r = rate(dec!(36.5));
        let mut invoice = usd_invoice(dec!(300));
        let mut previous = Decimal::ZERO;

        for amount in [dec!(20), dec!(0.01), dec!(150), dec!(42.42)] {
            let request =
                PaymentRequest::new(Currency::Usd, amount, r).with_method(method());
            engine.apply_payment(&mut invoice, None, &request).unwrap();

            let paid = invoice.total_paid_usd_equivalent(r).amount();
            assert!(paid >= previous);
            previous = paid;
        }
    }

    #[test]
    fn test_mixed_currency_invoice_settles_at_issue_rate() {
        let engine = SettlementEngine::new();
        // 4000 Bs invoice issued at 40 Bs/USD = 100 USD equivalent.
        let mut invoice = bs_invoice(dec!(4000), dec!(40));

        // 50 USD covers half even though today's rate differs.
        let request = PaymentRequest::new(Currency::Usd, dec!(50), rate(dec!(44)))
            .with_method(method());
        engine.apply_payment(&mut invoice, None, &request).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Partial);

        // 2000 Bs covers the rest at the issue rate.
        let request = PaymentRequest::new(Currency::Local, dec!(2000), rate(dec!(44)))
            .with_method(method());
        engine.apply_payment(&mut invoice, None, &request).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }
}

// ============================================================================
// Debt summary tests
// ============================================================================

mod debt_summary {
    use super::*;

    #[test]
    fn test_summary_aggregates_unpaid_invoices() {
        let engine = SettlementEngine::new();
        let r = rate(dec!(40));

        let mut partially_paid = usd_invoice(dec!(100));
        let request = PaymentRequest::new(Currency::Usd, dec!(60), r).with_method(method());
        engine
            .apply_payment(&mut partially_paid, None, &request)
            .unwrap();

        let unpaid = bs_invoice(dec!(2000), dec!(40));
        let mut paid = usd_invoice(dec!(30));
        let request = PaymentRequest::new(Currency::Usd, dec!(30), r).with_method(method());
        engine.apply_payment(&mut paid, None, &request).unwrap();

        let mut canceled = usd_invoice(dec!(500));
        canceled.status = InvoiceStatus::Canceled;

        let summary =
            engine.compute_debt_summary(&[partially_paid, unpaid, paid, canceled], r);

        // 40 remaining + 50 USD equivalent; paid and canceled contribute nothing.
        assert_eq!(summary.total_debt_usd, dec!(90.00));
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.invoices.len(), 2);
    }

    #[test]
    fn test_item_debts_scale_by_unpaid_fraction() {
        let engine = SettlementEngine::new();
        let r = rate(dec!(40));

        let mut invoice = usd_invoice(dec!(100))
            .with_item(InvoiceItem::new("Consultation", dec!(60), dec!(1)))
            .with_item(InvoiceItem::new("Deworming", dec!(20), dec!(2)));

        let request = PaymentRequest::new(Currency::Usd, dec!(75), r).with_method(method());
        engine.apply_payment(&mut invoice, None, &request).unwrap();

        let summary = engine.compute_debt_summary(&[invoice], r);
        let entry = &summary.invoices[0];

        assert_eq!(entry.remaining_usd, dec!(25.00));
        assert_eq!(entry.unpaid_fraction, dec!(0.25));
        // 60 * 0.25 and 40 * 0.25.
        assert_eq!(entry.items[0].remaining_usd, dec!(15.00));
        assert_eq!(entry.items[1].remaining_usd, dec!(10.00));
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        let engine = SettlementEngine::new();
        let summary = engine.compute_debt_summary(&[], rate(dec!(40)));

        assert_eq!(summary.total_debt_usd, Decimal::ZERO);
        assert_eq!(summary.invoice_count, 0);
        assert!(summary.invoices.is_empty());
    }
}

// ============================================================================
// Property tests
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Conservation: after any apply/cancel sequence, the buckets equal
        /// the sum over currently-active payments, and the credit balance
        /// never goes negative.
        #[test]
        fn conservation_holds_for_random_sequences(
            amounts in proptest::collection::vec((0u8..3u8, 1i64..50_000i64), 1..12),
            cancel_mask in proptest::collection::vec(any::<bool>(), 12),
            opening_credit in 0i64..100_000i64
        ) {
            let engine = SettlementEngine::new();
            let owner = OwnerId::new();
            let r = rate(dec!(36.5));
            let mut invoice = usd_invoice(dec!(100_000)).with_owner(owner);
            let mut account =
                OwnerCreditAccount::new(owner, Decimal::new(opening_credit, 2)).unwrap();
            let mut payments = Vec::new();

            for (kind, cents) in &amounts {
                let value = Decimal::new(*cents, 2);
                let request = match kind {
                    0 => PaymentRequest::new(Currency::Usd, value, r).with_method(method()),
                    1 => PaymentRequest::new(Currency::Local, value, r).with_method(method()),
                    _ => PaymentRequest::credit_only(value, r),
                };
                match engine.apply_payment(&mut invoice, Some(&mut account), &request) {
                    Ok(settlement) => payments.push(settlement.payment),
                    Err(SettlementError::InsufficientCredit { .. }) => {}
                    Err(other) => return Err(TestCaseError::fail(other.to_string())),
                }
            }

            for (payment, cancel) in payments.iter_mut().zip(&cancel_mask) {
                if *cancel {
                    engine
                        .cancel_payment(payment, &mut invoice, Some(&mut account), None)
                        .map_err(|e| TestCaseError::fail(e.to_string()))?;
                }
            }

            let active_total: Decimal = payments
                .iter()
                .filter(|p| p.is_active())
                .map(|p| p.amount_usd_equivalent.amount() + p.credit_amount_used.amount())
                .sum();
            let bucket_total = invoice.amount_paid_usd.amount()
                + invoice.amount_paid_local.to_usd(r).amount();

            // Each local-currency payment rounds once at the boundary when
            // applied and once when the bucket is converted back, so allow a
            // cent of drift per payment.
            let slack = Decimal::new(payments.len() as i64, 2);
            prop_assert!((bucket_total - active_total).abs() <= slack);
            prop_assert!(!account.balance_usd().is_negative());
            prop_assert!(!invoice.amount_paid_usd.is_negative());
            prop_assert!(!invoice.amount_paid_local.is_negative());
        }

        /// Round-trip: apply then cancel restores invoice and credit state.
        #[test]
        fn apply_then_cancel_is_identity(
            cents in 1i64..1_000_000i64,
            credit_cents in 0i64..50_000i64,
            use_local in any::<bool>()
        ) {
            let engine = SettlementEngine::new();
            let owner = OwnerId::new();
            let r = rate(dec!(36.5));
            let mut invoice = usd_invoice(dec!(50_000)).with_owner(owner);
            let mut account = OwnerCreditAccount::new(owner, dec!(500)).unwrap();

            let before_usd = invoice.amount_paid_usd;
            let before_local = invoice.amount_paid_local;
            let before_status = invoice.status;
            let before_balance = account.balance_usd();

            let currency = if use_local { Currency::Local } else { Currency::Usd };
            let mut request = PaymentRequest::new(currency, Decimal::new(cents, 2), r)
                .with_method(method());
            if credit_cents > 0 && Decimal::new(credit_cents, 2) <= before_balance.amount() {
                request = request.with_credit(Decimal::new(credit_cents, 2));
            }

            let mut payment = engine
                .apply_payment(&mut invoice, Some(&mut account), &request)
                .map_err(|e| TestCaseError::fail(e.to_string()))?
                .payment;
            engine
                .cancel_payment(&mut payment, &mut invoice, Some(&mut account), Some("prop"))
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(invoice.amount_paid_usd, before_usd);
            prop_assert_eq!(invoice.amount_paid_local, before_local);
            prop_assert_eq!(invoice.status, before_status);
            prop_assert_eq!(account.balance_usd(), before_balance);
        }
    }
}
