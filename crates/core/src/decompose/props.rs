//! Property-based tests for the decomposition engine.
//!
//! - Property 1: Balance Conservation
//! - Property 2: Currency-Count Compliance
//! - Property 3: Rate-Precision Compliance
//! - Property 4: Determinism
//! - Property 5: Idempotent Re-decomposition
//! - Property 6: Residual Boundedness

use chrono::NaiveDate;
use ledgerbridge_shared::{AccountId, CurrencyCode, TransactionId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::config::PrecisionConfig;
use super::pipeline::decompose;
use super::residual;
use crate::currency::fractional_digits;
use crate::journal::{LedgerTransaction, LineItem, SubTransaction};

/// Strategy to generate signed amounts at two decimal places.
fn amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates.
///
/// Mixes four-digit market rates with finer quotes carrying more fractional
/// digits than the backend accepts, so normalization has work to do.
fn rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..100_000i64).prop_map(|v| Decimal::new(v, 4)),
        (1_000_000i64..100_000_000_000i64).prop_map(|v| Decimal::new(v, 10)),
        (100_000_000i64..10_000_000_000_000i64).prop_map(|v| Decimal::new(v, 12)),
    ]
}

/// Strategy to generate non-reporting currency codes.
fn foreign_currency() -> impl Strategy<Value = CurrencyCode> {
    prop_oneof![
        Just(CurrencyCode::new("EUR").unwrap()),
        Just(CurrencyCode::new("GBP").unwrap()),
        Just(CurrencyCode::new("USD").unwrap()),
    ]
}

fn chf() -> CurrencyCode {
    CurrencyCode::new("CHF").unwrap()
}

fn test_config() -> PrecisionConfig {
    PrecisionConfig::new(chf(), AccountId::new(9999))
        .with_precision(chf(), 2)
        .with_precision(CurrencyCode::new("EUR").unwrap(), 2)
        .with_precision(CurrencyCode::new("GBP").unwrap(), 2)
        .with_precision(CurrencyCode::new("USD").unwrap(), 2)
}

/// Strategy to generate balanced multi-currency transactions.
///
/// Foreign lines are generated freely; one reporting-currency counter line
/// closes the transaction to an exact zero total.
fn balanced_transaction() -> impl Strategy<Value = LedgerTransaction> {
    proptest::collection::vec((foreign_currency(), amount(), rate()), 1..4).prop_map(|lines| {
        let mut items = Vec::with_capacity(lines.len() + 1);
        let mut total = Decimal::ZERO;
        for (index, (currency, amount, rate)) in lines.into_iter().enumerate() {
            total += amount * rate;
            let account = AccountId::new(1000 + u32::try_from(index).unwrap());
            items.push(LineItem::new(account, currency, amount, rate));
        }
        items.push(LineItem::new(
            AccountId::new(2000),
            chf(),
            -total,
            Decimal::ONE,
        ));
        LedgerTransaction::new(
            TransactionId::new("prop-1"),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "Generated transaction",
            items,
        )
    })
}

fn recorded_balance(sub: &SubTransaction, config: &PrecisionConfig) -> Decimal {
    sub.recorded_balance(config.reporting_currency, config.reporting_precision().unwrap())
        .amount
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Balance Conservation
    // =========================================================================

    /// Property 1.1: Balanced transactions always decompose.
    ///
    /// *For any* transaction whose lines sum to an exact zero in reporting
    /// terms, decomposition SHALL succeed and the built-in equivalence check
    /// SHALL pass.
    #[test]
    fn prop_balanced_transaction_decomposes(txn in balanced_transaction()) {
        let result = decompose(&txn, &test_config());
        prop_assert!(result.is_ok(), "decomposition failed: {:?}", result);
    }

    /// Property 1.2: Every sub-transaction balances to zero as recorded.
    ///
    /// *For any* emitted sub-transaction, the backend values of its lines
    /// SHALL sum to exactly zero in the reporting currency.
    #[test]
    fn prop_sub_transactions_balance(txn in balanced_transaction()) {
        let config = test_config();
        let subs = decompose(&txn, &config).unwrap();
        for sub in &subs {
            prop_assert_eq!(recorded_balance(sub, &config), Decimal::ZERO);
        }
    }

    // =========================================================================
    // Property 2: Currency-Count Compliance
    // =========================================================================

    /// Property 2.1: At most one foreign currency per sub-transaction.
    ///
    /// *For any* emitted sub-transaction, the count of distinct non-reporting
    /// currencies among its lines SHALL be at most one.
    #[test]
    fn prop_at_most_one_foreign_currency(txn in balanced_transaction()) {
        let config = test_config();
        let subs = decompose(&txn, &config).unwrap();
        for sub in &subs {
            prop_assert!(sub.foreign_currency_count(config.reporting_currency) <= 1);
        }
    }

    // =========================================================================
    // Property 3: Rate-Precision Compliance
    // =========================================================================

    /// Property 3.1: Every emitted rate fits the backend's rate precision.
    ///
    /// *For any* line of any emitted sub-transaction, the FX rate SHALL carry
    /// at most `max_rate_digits` fractional digits.
    #[test]
    fn prop_rates_fit_precision(txn in balanced_transaction()) {
        let config = test_config();
        let subs = decompose(&txn, &config).unwrap();
        for sub in &subs {
            for item in &sub.items {
                prop_assert!(fractional_digits(item.rate) <= config.max_rate_digits);
            }
        }
    }

    // =========================================================================
    // Property 4: Determinism
    // =========================================================================

    /// Property 4.1: Identical input yields identical output.
    ///
    /// *For any* transaction, two decompositions with the same configuration
    /// SHALL produce identical sequences.
    #[test]
    fn prop_decomposition_deterministic(txn in balanced_transaction()) {
        let config = test_config();
        let first = decompose(&txn, &config).unwrap();
        let second = decompose(&txn, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    // =========================================================================
    // Property 5: Idempotent Re-decomposition
    // =========================================================================

    /// Property 5.1: A compliant sub-transaction decomposes to itself.
    ///
    /// *For any* emitted sub-transaction resubmitted as a transaction,
    /// decomposition SHALL yield a single sub-transaction with the same
    /// line items.
    #[test]
    fn prop_re_decomposition_is_identity(txn in balanced_transaction()) {
        let config = test_config();
        for sub in decompose(&txn, &config).unwrap() {
            let again = LedgerTransaction::new(
                TransactionId::new(sub.source.key()),
                sub.date,
                sub.description.clone(),
                sub.items.clone(),
            );
            let redone = decompose(&again, &config).unwrap();
            prop_assert_eq!(redone.len(), 1);
            prop_assert_eq!(&redone[0].items, &sub.items);
        }
    }

    // =========================================================================
    // Property 6: Residual Boundedness
    // =========================================================================

    /// Property 6.1: Residual lines never exceed the configured cap.
    ///
    /// *For any* emitted sub-transaction carrying a residual line, its
    /// magnitude SHALL be within the allocator's cap for the lines it
    /// covers. Compensating lines are balancing draws, not rounding
    /// residue: they net out across the batch and are not capped here.
    #[test]
    fn prop_residuals_bounded(txn in balanced_transaction()) {
        let config = test_config();
        let subs = decompose(&txn, &config).unwrap();
        for sub in &subs {
            if let Some(line) = sub.residual_line(config.residual_account) {
                let cap = residual::residual_limit(&config, sub.items.len() - 1).unwrap();
                prop_assert!(
                    line.amount.abs() <= cap,
                    "residual {} exceeds cap {}",
                    line.amount,
                    cap
                );
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use rust_decimal_macros::dec;

    use crate::journal::COMPENSATING_DESCRIPTION;

    use super::*;

    /// Specific example: sub-cent lines exhaust the coverage pool early, so
    /// the final group balances through a synthesized compensating line.
    #[test]
    fn test_pool_exhaustion_synthesizes_compensation() {
        let items = vec![
            LineItem::new(
                AccountId::new(1000),
                CurrencyCode::new("EUR").unwrap(),
                dec!(0.15),
                dec!(0.1),
            ),
            LineItem::new(
                AccountId::new(1001),
                CurrencyCode::new("GBP").unwrap(),
                dec!(0.15),
                dec!(0.1),
            ),
            LineItem::new(
                AccountId::new(1002),
                CurrencyCode::new("USD").unwrap(),
                dec!(0.15),
                dec!(0.1),
            ),
            LineItem::new(AccountId::new(2000), chf(), dec!(-0.045), Decimal::ONE),
        ];
        let txn = LedgerTransaction::new(
            TransactionId::new("prop-2"),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "Sub-cent settlement",
            items,
        );
        let config = test_config();

        let subs = decompose(&txn, &config).unwrap();
        assert_eq!(subs.len(), 3);
        for sub in &subs {
            assert_eq!(recorded_balance(sub, &config), Decimal::ZERO);
        }

        // Each group needs 0.02 of coverage but the pool only holds 0.04.
        let synthesized = &subs[2].items[1];
        assert_eq!(synthesized.account, AccountId::new(9999));
        assert_eq!(synthesized.amount, dec!(-0.02));
        assert_eq!(
            synthesized.description.as_deref(),
            Some(COMPENSATING_DESCRIPTION)
        );
    }
}
