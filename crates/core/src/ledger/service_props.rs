//! Property-based tests for entry validation and settlement bounds.
//!
//! - Balance: an entry is accepted iff debits equal credits
//! - Settlement bound: accepted matches never exceed a line's amount

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::service::LedgerService;
use super::settlement::{LineMatchState, SettlementService};
use super::types::{AccountRef, CreateJournalEntryInput, EntrySide, JournalLineInput};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn side_strategy() -> impl Strategy<Value = EntrySide> {
    prop_oneof![Just(EntrySide::Debit), Just(EntrySide::Credit)]
}

fn make_line(side: EntrySide, amount: Decimal) -> JournalLineInput {
    let account = AccountRef::GlAccount(Uuid::new_v4());
    match side {
        EntrySide::Debit => JournalLineInput::debit(account, amount),
        EntrySide::Credit => JournalLineInput::credit(account, amount),
    }
}

fn make_input(lines: Vec<JournalLineInput>) -> CreateJournalEntryInput {
    CreateJournalEntryInput::new(
        "Generated",
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        lines,
    )
}

/// Splits `total` into `parts` positive cent amounts.
fn split(total: Decimal, parts: usize) -> Vec<Decimal> {
    let cents = (total * Decimal::ONE_HUNDRED).trunc();
    let parts_dec = Decimal::from(parts);
    let base = (cents / parts_dec).trunc();
    let mut out = vec![base / Decimal::ONE_HUNDRED; parts];
    let rest = cents - base * parts_dec;
    out[0] += rest / Decimal::ONE_HUNDRED;
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any entry built from one debit split over N credits is accepted and
    /// its totals agree.
    #[test]
    fn prop_balanced_entries_accepted(
        total in (200i64..1_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        parts in 1usize..=2,
    ) {
        let mut lines = vec![make_line(EntrySide::Debit, total)];
        for amount in split(total, parts) {
            lines.push(make_line(EntrySide::Credit, amount));
        }

        let totals = LedgerService::validate_entry(&make_input(lines), |_| Ok(()));
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, total);
        prop_assert_eq!(totals.credit, total);
    }

    /// Entries whose sides do not sum equal are always rejected.
    #[test]
    fn prop_unbalanced_entries_rejected(
        lines_in in prop::collection::vec((side_strategy(), positive_amount()), 2..8),
    ) {
        let lines: Vec<JournalLineInput> =
            lines_in.iter().map(|(side, amount)| make_line(*side, *amount)).collect();
        let totals = LedgerService::calculate_totals(&lines);
        let result = LedgerService::validate_entry(&make_input(lines), |_| Ok(()));

        if totals.debit == totals.credit {
            prop_assert!(result.is_ok());
        } else {
            let is_unbalanced = matches!(result, Err(LedgerError::UnbalancedEntry { .. }));
            prop_assert!(is_unbalanced);
        }
    }

    /// Applying a random sequence of match requests, keeping only the
    /// accepted ones, never matches more than either line's amount.
    #[test]
    fn prop_settlement_bound(
        debit_amount in positive_amount(),
        credit_amount in positive_amount(),
        requests in prop::collection::vec(positive_amount(), 1..20),
    ) {
        let mut debit = LineMatchState {
            line_id: Uuid::new_v4(),
            side: EntrySide::Debit,
            amount: debit_amount,
            matched: Decimal::ZERO,
        };
        let mut credit = LineMatchState {
            line_id: Uuid::new_v4(),
            side: EntrySide::Credit,
            amount: credit_amount,
            matched: Decimal::ZERO,
        };

        for requested in requests {
            let fits = requested <= debit.remaining() && requested <= credit.remaining();
            match SettlementService::validate_match(&debit, &credit, requested) {
                Ok(()) => {
                    prop_assert!(fits);
                    debit.matched += requested;
                    credit.matched += requested;
                }
                Err(LedgerError::OverMatch { .. }) => prop_assert!(!fits),
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
            prop_assert!(debit.matched <= debit.amount);
            prop_assert!(credit.matched <= credit.amount);
        }
    }
}
