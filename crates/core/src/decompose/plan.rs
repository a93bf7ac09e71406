//! Decomposition planner.
//!
//! Turns the currency groups of one transaction into backend-compliant
//! sub-transactions. Each non-reporting group becomes one sub-transaction
//! carrying its foreign lines plus enough reporting-currency coverage to
//! balance it. Coverage is drawn from a pool built out of the transaction's
//! own reporting-currency lines; only when the pool cannot supply a group
//! does the planner synthesize a compensating line on the residual account.

use ledgerbridge_shared::CurrencyCode;
use rust_decimal::Decimal;

use crate::currency::round_half_even;
use crate::journal::{
    COMPENSATING_DESCRIPTION, LedgerTransaction, LineItem, SourceRef, SubTransaction,
};

use super::config::PrecisionConfig;
use super::error::DecomposeError;
use super::normalize::normalize;
use super::partition::CurrencyGroup;
use super::residual;

/// A reporting-currency line available to cover foreign groups.
///
/// `remaining` starts at the normalized amount and is drawn down to zero
/// over the course of planning.
struct PoolLine {
    line: LineItem,
    remaining: Decimal,
}

impl PoolLine {
    /// Renders a drawn piece as an output line.
    ///
    /// A piece consuming the whole line keeps its tax code; a partial piece
    /// drops it, since a tax amount cannot be split across sub-transactions.
    fn piece_line(&self, amount: Decimal) -> LineItem {
        if amount == self.line.amount {
            return self.line.clone();
        }
        let mut piece = LineItem::new(self.line.account, self.line.currency, amount, Decimal::ONE);
        piece.description = self.line.description.clone();
        piece
    }
}

/// A foreign-currency group after normalization.
struct ForeignGroup {
    currency: CurrencyCode,
    lines: Vec<LineItem>,
    backend_sum: Decimal,
    exact_sum: Decimal,
}

/// Plans the sub-transactions for one partitioned transaction.
///
/// Groups must come from [`partition`](super::partition::partition) so that
/// their order and coercions hold. The returned batch preserves group order;
/// a transaction without foreign currency yields exactly one sub-transaction.
///
/// # Errors
///
/// Returns [`DecomposeError::InvalidRate`] or
/// [`DecomposeError::MissingPrecision`] from normalization,
/// [`DecomposeError::UnbalanceableGroup`] when the transaction does not
/// balance in reporting terms, and [`DecomposeError::ResidualTooLarge`] when
/// a sub-transaction's rounding drift exceeds the configured cap.
pub fn plan(
    transaction: &LedgerTransaction,
    groups: &[CurrencyGroup],
    config: &PrecisionConfig,
) -> Result<Vec<SubTransaction>, DecomposeError> {
    let reporting = config.reporting_currency;

    let mut pool: Vec<PoolLine> = Vec::new();
    let mut foreign: Vec<ForeignGroup> = Vec::new();
    for group in groups {
        if group.is_reporting(reporting) {
            pool = build_pool(group, config)?;
        } else {
            foreign.push(build_foreign(group, config)?);
        }
    }

    // The residual policy caps how much drift the whole batch may absorb.
    // An imbalance beyond that cap cannot be rounding and marks the input
    // itself as inconsistent.
    let total: Decimal = groups
        .iter()
        .map(|group| group.exact_reporting_sum(reporting))
        .sum();
    if total.abs() > residual::residual_limit(config, transaction.items.len())? {
        return Err(DecomposeError::UnbalanceableGroup {
            currency: widest_group(groups, reporting),
            imbalance: total,
        });
    }

    if foreign.is_empty() {
        let sub = plan_reporting_only(transaction, pool, config)?;
        return Ok(vec![sub]);
    }

    plan_foreign(transaction, foreign, pool, config)
}

/// Builds the coverage pool from the reporting-currency group.
fn build_pool(
    group: &CurrencyGroup,
    config: &PrecisionConfig,
) -> Result<Vec<PoolLine>, DecomposeError> {
    let mut pool = Vec::with_capacity(group.items.len());
    for item in &group.items {
        let normalized = normalize(item.rate, item.amount, item.currency, config)?;
        let mut line = item.clone();
        line.amount = normalized.amount;
        line.rate = normalized.rate;
        pool.push(PoolLine {
            remaining: normalized.amount,
            line,
        });
    }
    Ok(pool)
}

/// Normalizes one foreign group and records its backend and exact sums.
fn build_foreign(
    group: &CurrencyGroup,
    config: &PrecisionConfig,
) -> Result<ForeignGroup, DecomposeError> {
    let mut lines = Vec::with_capacity(group.items.len());
    let mut backend_sum = Decimal::ZERO;
    let mut exact_sum = Decimal::ZERO;
    for item in &group.items {
        let normalized = normalize(item.rate, item.amount, item.currency, config)?;
        backend_sum += normalized.backend_value;
        exact_sum += normalized.exact_value();
        let mut line = item.clone();
        line.amount = normalized.amount;
        line.rate = normalized.rate;
        lines.push(line);
    }
    Ok(ForeignGroup {
        currency: group.currency,
        lines,
        backend_sum,
        exact_sum,
    })
}

/// Single-currency case: the transaction passes through as one
/// sub-transaction, normalized but otherwise verbatim.
fn plan_reporting_only(
    transaction: &LedgerTransaction,
    pool: Vec<PoolLine>,
    config: &PrecisionConfig,
) -> Result<SubTransaction, DecomposeError> {
    let balance: Decimal = pool.iter().map(|entry| entry.line.amount).sum();
    let items: Vec<LineItem> = pool.into_iter().map(|entry| entry.line).collect();
    let mut sub = SubTransaction {
        source: SourceRef::new(transaction.id.clone(), config.reporting_currency),
        date: transaction.date,
        description: transaction.description.clone(),
        items,
    };
    residual::allocate(&mut sub, -balance, config)?;
    Ok(sub)
}

/// Emits one sub-transaction per foreign group, drawing coverage from the
/// pool. The last group sweeps whatever the pool still holds, so the pool
/// always closes at zero.
fn plan_foreign(
    transaction: &LedgerTransaction,
    foreign: Vec<ForeignGroup>,
    mut pool: Vec<PoolLine>,
    config: &PrecisionConfig,
) -> Result<Vec<SubTransaction>, DecomposeError> {
    let places = config.reporting_precision()?;
    let order = consumption_order(&pool);
    let group_count = foreign.len();
    let mut subs = Vec::with_capacity(group_count);

    for (index, group) in foreign.into_iter().enumerate() {
        let is_last = index + 1 == group_count;
        let backend_need = -group.backend_sum;
        let target = round_half_even(-group.exact_sum, places);

        let mut pieces = vec![Decimal::ZERO; pool.len()];
        let uncovered = draw(&mut pool, &order, &mut pieces, target);
        if is_last {
            sweep(&mut pool, &mut pieces);
        }

        let mut covered = uncovered;
        let mut items = group.lines;
        for (slot, piece) in pieces.iter().enumerate() {
            if piece.is_zero() {
                continue;
            }
            covered += *piece;
            items.push(pool[slot].piece_line(*piece));
        }
        if !uncovered.is_zero() {
            items.push(
                LineItem::new(
                    config.residual_account,
                    config.reporting_currency,
                    uncovered,
                    Decimal::ONE,
                )
                .with_description(COMPENSATING_DESCRIPTION),
            );
        }

        let mut sub = SubTransaction {
            source: SourceRef::new(transaction.id.clone(), group.currency),
            date: transaction.date,
            description: transaction.description.clone(),
            items,
        };
        residual::allocate(&mut sub, backend_need - covered, config)?;
        subs.push(sub);
    }

    // The final sweep drained the pool; every reporting line has been
    // assigned to exactly one sub-transaction.
    debug_assert!(pool.iter().all(|entry| entry.remaining.is_zero()));

    Ok(subs)
}

/// Draws `target` out of the pool, preferring lines whose sign matches.
///
/// Falls back to pushing the shortfall through the largest line still open
/// (to be recovered by later groups or the final sweep), and only when the
/// pool is fully drained returns the amount left to synthesize.
fn draw(
    pool: &mut [PoolLine],
    order: &[usize],
    pieces: &mut [Decimal],
    target: Decimal,
) -> Decimal {
    let mut need = target;
    for &slot in order {
        if need.is_zero() {
            break;
        }
        let remaining = pool[slot].remaining;
        if remaining.is_zero() || !same_sign(remaining, need) {
            continue;
        }
        let take = if remaining.abs() >= need.abs() {
            need
        } else {
            remaining
        };
        pieces[slot] += take;
        pool[slot].remaining -= take;
        need -= take;
    }
    if need.is_zero() {
        return Decimal::ZERO;
    }
    if let Some(&slot) = order.iter().find(|&&slot| !pool[slot].remaining.is_zero()) {
        pieces[slot] += need;
        pool[slot].remaining -= need;
        return Decimal::ZERO;
    }
    need
}

/// Assigns every open pool balance to the current group.
fn sweep(pool: &mut [PoolLine], pieces: &mut [Decimal]) {
    for (slot, entry) in pool.iter_mut().enumerate() {
        if !entry.remaining.is_zero() {
            pieces[slot] += entry.remaining;
            entry.remaining = Decimal::ZERO;
        }
    }
}

/// Pool indices ordered by descending magnitude, position breaking ties.
fn consumption_order(pool: &[PoolLine]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| {
        pool[b]
            .line
            .amount
            .abs()
            .cmp(&pool[a].line.amount.abs())
            .then(a.cmp(&b))
    });
    order
}

/// The group contributing the most to an unbalanced total, for error
/// attribution.
fn widest_group(groups: &[CurrencyGroup], reporting: CurrencyCode) -> CurrencyCode {
    groups
        .iter()
        .max_by_key(|group| group.exact_reporting_sum(reporting).abs())
        .map_or(reporting, |group| group.currency)
}

fn same_sign(a: Decimal, b: Decimal) -> bool {
    a.is_sign_positive() == b.is_sign_positive()
}
