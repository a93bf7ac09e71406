//! Post-decomposition equivalence check.
//!
//! Confirms that a planned batch tells the same story as the original
//! transaction once both sit at backend precision: native amounts per
//! account and foreign currency, recorded reporting values per account.
//! Drift that normalization itself introduces is booked to the residual
//! account, which both comparisons exempt, so only drift the planner added
//! can fail the check.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ledgerbridge_shared::{AccountId, CurrencyCode};
use rust_decimal::Decimal;

use crate::currency::unit;
use crate::journal::{LedgerTransaction, LineItem, SubTransaction};

use super::config::PrecisionConfig;
use super::error::DecomposeError;
use super::normalize::normalize;

/// One balance that diverged between the original transaction and its
/// decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceMismatch {
    /// Account whose balance diverged.
    pub account: AccountId,
    /// Currency the balance is stated in.
    pub currency: CurrencyCode,
    /// Balance implied by the original transaction.
    pub expected: Decimal,
    /// Balance implied by the sub-transaction batch.
    pub actual: Decimal,
}

impl fmt::Display for BalanceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account {} in {}: expected {}, actual {}",
            self.account, self.currency, self.expected, self.actual
        )
    }
}

/// Checks that `subs` aggregate back to `original` within tolerance.
///
/// Both sides are projected to backend precision first: the original's
/// amounts are normalized exactly as the planner normalizes them, so
/// rounding the configuration mandates cannot read as planner drift. That
/// drift sits on the exempt residual account instead, where the allocator
/// capped it. Foreign balances are compared per account and currency,
/// recorded reporting values per account; a reporting-currency amount is
/// its own recorded value, so each diverging balance appears exactly once.
///
/// Runs after planning as a hard post-condition: a failure here means the
/// planner produced a non-equivalent batch and the caller must not submit it.
///
/// # Errors
///
/// Returns [`DecomposeError::Equivalence`] carrying one
/// [`BalanceMismatch`] per diverging balance, and
/// [`DecomposeError::MissingPrecision`] or [`DecomposeError::InvalidRate`]
/// when a compared line cannot be normalized.
pub fn validate_equivalence(
    original: &LedgerTransaction,
    subs: &[SubTransaction],
    config: &PrecisionConfig,
) -> Result<(), DecomposeError> {
    let original_view = project(original.items.iter(), config)?;
    let batch_view = project(subs.iter().flat_map(|sub| sub.items.iter()), config)?;

    let mut mismatches = Vec::new();

    let keys: BTreeSet<&(AccountId, CurrencyCode)> = original_view
        .native
        .keys()
        .chain(batch_view.native.keys())
        .collect();
    for key in keys {
        let expected = balance(&original_view.native, key);
        let actual = balance(&batch_view.native, key);
        let tolerance = unit(config.precision(key.1)?);
        if (expected - actual).abs() > tolerance {
            mismatches.push(BalanceMismatch {
                account: key.0,
                currency: key.1,
                expected,
                actual,
            });
        }
    }

    let accounts: BTreeSet<&AccountId> = original_view
        .reporting
        .keys()
        .chain(batch_view.reporting.keys())
        .collect();
    let tolerance = unit(config.reporting_precision()?);
    for account in accounts {
        let expected = original_view
            .reporting
            .get(account)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let actual = batch_view
            .reporting
            .get(account)
            .copied()
            .unwrap_or(Decimal::ZERO);
        if (expected - actual).abs() > tolerance {
            mismatches.push(BalanceMismatch {
                account: *account,
                currency: config.reporting_currency,
                expected,
                actual,
            });
        }
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(DecomposeError::Equivalence { mismatches })
    }
}

/// Backend-precision balances of one set of lines, residual account
/// skipped.
///
/// Native balances cover non-reporting currencies only: a
/// reporting-currency amount already is its recorded value, so the
/// reporting balances carry it alone.
struct BalanceView {
    native: BTreeMap<(AccountId, CurrencyCode), Decimal>,
    reporting: BTreeMap<AccountId, Decimal>,
}

fn project<'a>(
    items: impl Iterator<Item = &'a LineItem>,
    config: &PrecisionConfig,
) -> Result<BalanceView, DecomposeError> {
    let mut view = BalanceView {
        native: BTreeMap::new(),
        reporting: BTreeMap::new(),
    };
    for item in items.filter(|item| item.account != config.residual_account) {
        let normalized = normalize(item.rate, item.amount, item.currency, config)?;
        if !config.is_reporting(item.currency) {
            *view.native
                .entry((item.account, item.currency))
                .or_insert(Decimal::ZERO) += normalized.amount;
        }
        *view.reporting.entry(item.account).or_insert(Decimal::ZERO) += normalized.backend_value;
    }
    Ok(view)
}

fn balance(
    balances: &BTreeMap<(AccountId, CurrencyCode), Decimal>,
    key: &(AccountId, CurrencyCode),
) -> Decimal {
    balances.get(key).copied().unwrap_or(Decimal::ZERO)
}
