//! End-to-end tests for the decomposing write path.

use chrono::NaiveDate;
use ledgerbridge_shared::{AccountId, CurrencyCode, TransactionId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::decompose::{DecomposeError, PrecisionConfig};
use crate::journal::{AccountChart, LedgerTransaction, LineItem, SourceRef, SubTransaction};

use super::backend::RestrictedBackend;
use super::error::EngineError;
use super::memory::InMemoryBackend;
use super::service::{DecomposingLedger, LedgerEngine};

fn cur(code: &str) -> CurrencyCode {
    CurrencyCode::new(code).unwrap()
}

fn chart() -> AccountChart {
    AccountChart::new()
        .with_account(AccountId::new(1020), cur("CHF"), "Bank CHF")
        .with_account(AccountId::new(1100), cur("USD"), "Receivables USD")
        .with_account(AccountId::new(1200), cur("EUR"), "Receivables EUR")
        .with_account(AccountId::new(9999), cur("CHF"), "FX rounding differences")
}

fn config() -> PrecisionConfig {
    PrecisionConfig::new(cur("CHF"), AccountId::new(9999))
        .with_precision(cur("CHF"), 2)
        .with_precision(cur("EUR"), 2)
        .with_precision(cur("USD"), 2)
}

fn engine() -> DecomposingLedger<InMemoryBackend> {
    let backend = InMemoryBackend::new(cur("CHF"), 8);
    DecomposingLedger::new(backend, chart(), config()).unwrap()
}

fn collective() -> LedgerTransaction {
    LedgerTransaction::new(
        TransactionId::new("inv-1"),
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        "Invoice 44",
        vec![
            LineItem::new(AccountId::new(1100), cur("USD"), dec!(100), dec!(0.9123456789)),
            LineItem::new(AccountId::new(1200), cur("EUR"), dec!(50), dec!(1.0567891234)),
            LineItem::new(
                AccountId::new(1020),
                cur("CHF"),
                dec!(-144.07402406),
                Decimal::ONE,
            ),
        ],
    )
}

/// Store that fails after accepting a fixed number of entries and,
/// optionally, refuses deletes during rollback.
struct FlakyBackend {
    inner: InMemoryBackend,
    accepts: usize,
    fail_deletes: bool,
}

impl FlakyBackend {
    fn new(accepts: usize, fail_deletes: bool) -> Self {
        Self {
            inner: InMemoryBackend::new(cur("CHF"), 8),
            accepts,
            fail_deletes,
        }
    }
}

impl RestrictedBackend for FlakyBackend {
    fn create_entry(&mut self, entry: &SubTransaction) -> Result<(), EngineError> {
        if self.inner.len() >= self.accepts {
            return Err(EngineError::EntryRejected {
                key: entry.source.key(),
                reason: "store unavailable".to_string(),
            });
        }
        self.inner.create_entry(entry)
    }

    fn delete_entry(&mut self, source: &SourceRef) -> Result<bool, EngineError> {
        if self.fail_deletes {
            return Err(EngineError::EntryRejected {
                key: source.key(),
                reason: "store unavailable".to_string(),
            });
        }
        self.inner.delete_entry(source)
    }

    fn entries(&self) -> Vec<&SubTransaction> {
        self.inner.entries()
    }
}

#[test]
fn posts_a_collective_transaction_as_compliant_entries() {
    let mut engine = engine();

    let submitted = engine.post_transaction(&collective()).unwrap();
    let keys: Vec<String> = submitted.iter().map(SourceRef::key).collect();
    assert_eq!(keys, vec!["inv-1:EUR", "inv-1:USD"]);

    let journal = engine.journal();
    assert_eq!(journal.len(), 2);
    for entry in journal {
        assert!(entry.foreign_currency_count(cur("CHF")) <= 1);
        assert!(entry.recorded_balance(cur("CHF"), 2).is_zero());
    }
}

#[test]
fn rejects_unknown_accounts_before_submission() {
    let mut engine = engine();
    let transaction = LedgerTransaction::new(
        TransactionId::new("inv-2"),
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        "Mistyped account",
        vec![
            LineItem::new(AccountId::new(7777), cur("CHF"), dec!(10), Decimal::ONE),
            LineItem::new(AccountId::new(1020), cur("CHF"), dec!(-10), Decimal::ONE),
        ],
    );

    assert_eq!(
        engine.post_transaction(&transaction).unwrap_err(),
        EngineError::UnknownAccount(AccountId::new(7777))
    );
    assert!(engine.journal().is_empty());
}

#[test]
fn empty_transaction_surfaces_the_decomposition_error() {
    let mut engine = engine();
    let transaction = LedgerTransaction::new(
        TransactionId::new("inv-3"),
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        "Nothing to post",
        Vec::new(),
    );

    assert_eq!(
        engine.post_transaction(&transaction).unwrap_err(),
        EngineError::Decompose(DecomposeError::EmptyTransaction)
    );
}

#[test]
fn requires_the_residual_account_in_the_chart() {
    let chart = AccountChart::new().with_account(AccountId::new(1020), cur("CHF"), "Bank CHF");
    let backend = InMemoryBackend::new(cur("CHF"), 8);

    let err = DecomposingLedger::new(backend, chart, config()).unwrap_err();
    assert_eq!(err, EngineError::MissingResidualAccount(AccountId::new(9999)));
}

#[test]
fn requires_a_reporting_denominated_residual_account() {
    let chart = AccountChart::new()
        .with_account(AccountId::new(1020), cur("CHF"), "Bank CHF")
        .with_account(AccountId::new(9999), cur("EUR"), "FX rounding differences");
    let backend = InMemoryBackend::new(cur("CHF"), 8);

    let err = DecomposingLedger::new(backend, chart, config()).unwrap_err();
    assert_eq!(
        err,
        EngineError::ResidualAccountCurrency {
            account: AccountId::new(9999),
            currency: cur("EUR"),
            expected: cur("CHF"),
        }
    );
}

#[test]
fn unwinds_the_batch_when_a_later_entry_is_rejected() {
    let backend = FlakyBackend::new(1, false);
    let mut engine = DecomposingLedger::new(backend, chart(), config()).unwrap();

    let err = engine.post_transaction(&collective()).unwrap_err();
    assert!(matches!(err, EngineError::EntryRejected { .. }));
    assert!(engine.journal().is_empty());
}

#[test]
fn keeps_the_orphan_when_rollback_deletes_fail() {
    let backend = FlakyBackend::new(1, true);
    let mut engine = DecomposingLedger::new(backend, chart(), config()).unwrap();

    let err = engine.post_transaction(&collective()).unwrap_err();
    let EngineError::EntryRejected { key, .. } = err else {
        panic!("expected rejection");
    };
    // The create failure wins; the entry the store refused to delete
    // stays visible for operators to clean up.
    assert_eq!(key, "inv-1:USD");
    assert_eq!(engine.journal().len(), 1);
}

#[test]
fn re_posting_the_same_transaction_leaves_the_journal_untouched() {
    let mut engine = engine();
    engine.post_transaction(&collective()).unwrap();

    let err = engine.post_transaction(&collective()).unwrap_err();
    assert!(matches!(err, EngineError::EntryRejected { .. }));
    assert_eq!(engine.journal().len(), 2);
}

#[test]
fn delete_removes_every_entry_of_the_transaction() {
    let mut engine = engine();
    engine.post_transaction(&collective()).unwrap();
    assert_eq!(engine.journal().len(), 2);

    engine.delete_transaction(&TransactionId::new("inv-1")).unwrap();
    assert!(engine.journal().is_empty());

    assert_eq!(
        engine.delete_transaction(&TransactionId::new("inv-1")).unwrap_err(),
        EngineError::UnknownTransaction(TransactionId::new("inv-1"))
    );
}

#[test]
fn backend_rejects_a_collective_entry_directly() {
    let mut backend = InMemoryBackend::new(cur("CHF"), 8);
    let entry = SubTransaction {
        source: SourceRef::new(TransactionId::new("raw-1"), cur("EUR")),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        description: "Hand-built collective".to_string(),
        items: vec![
            LineItem::new(AccountId::new(1200), cur("EUR"), dec!(10), dec!(1.2)),
            LineItem::new(AccountId::new(1100), cur("USD"), dec!(10), dec!(0.9)),
            LineItem::new(AccountId::new(1020), cur("CHF"), dec!(-21), Decimal::ONE),
        ],
    };

    let err = backend.create_entry(&entry).unwrap_err();
    assert!(matches!(err, EngineError::EntryRejected { .. }));
    assert!(backend.is_empty());
}

#[test]
fn backend_rejects_rates_beyond_the_digit_limit() {
    let mut backend = InMemoryBackend::new(cur("CHF"), 8);
    let entry = SubTransaction {
        source: SourceRef::new(TransactionId::new("raw-2"), cur("USD")),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        description: "Unrounded rate".to_string(),
        items: vec![
            LineItem::new(
                AccountId::new(1100),
                cur("USD"),
                dec!(100),
                dec!(0.9123456789),
            ),
            LineItem::new(AccountId::new(1020), cur("CHF"), dec!(-91.23), Decimal::ONE),
        ],
    };

    let err = backend.create_entry(&entry).unwrap_err();
    let EngineError::EntryRejected { key, reason } = err else {
        panic!("expected rejection");
    };
    assert_eq!(key, "raw-2:USD");
    assert!(reason.contains("fractional digits"));
}
