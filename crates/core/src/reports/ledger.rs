//! Ledger row building.
//!
//! The db crate loads entries with all their lines and flags which lines
//! are subject lines; everything after that happens here so the running
//! balance rules are unit-testable without a database.

use chrono::NaiveDate;
use rentledger_shared::types::{JournalEntryId, JournalLineId, PageRequest, PageResponse};
use rust_decimal::Decimal;

use super::period::LedgerPeriod;
use super::types::{LedgerReport, LedgerRow};
use crate::ledger::{AccountNature, EntrySide, RunningBalance};

/// A posted line as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLineView {
    /// Line id.
    pub line_id: JournalLineId,
    /// Line side.
    pub side: EntrySide,
    /// Line amount.
    pub amount: Decimal,
    /// Account code and name, bank name or counterparty label.
    pub label: String,
    /// Nature of the line's effective GL account (debit when it has none).
    pub nature: AccountNature,
    /// Whether the line matches the ledger filter.
    pub is_subject: bool,
}

impl LedgerLineView {
    /// Signed change of this line under its own nature.
    #[must_use]
    pub fn signed_change(&self) -> Decimal {
        self.nature.signed_change(self.side, self.amount)
    }
}

/// A posted entry with all of its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntryView {
    /// Entry id.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// All lines of the entry.
    pub lines: Vec<LedgerLineView>,
}

/// Builds ledger reports from loaded entries.
pub struct LedgerBuilder;

impl LedgerBuilder {
    /// Opening balance: the signed changes of every subject line dated
    /// before the anchor.
    ///
    /// This is the closing balance of the month preceding the anchor month,
    /// carried over month by month from the first posted line.
    #[must_use]
    pub fn opening_balance<'a, I>(entries: I, period: &LedgerPeriod) -> Decimal
    where
        I: IntoIterator<Item = &'a LedgerEntryView>,
    {
        entries
            .into_iter()
            .filter(|entry| period.is_opening(entry.date))
            .flat_map(|entry| entry.lines.iter())
            .filter(|line| line.is_subject)
            .map(LedgerLineView::signed_change)
            .sum()
    }

    /// Builds the ledger rows for the entries inside the period window.
    ///
    /// Rows are ordered by `(date, entry id, line id)`; entries outside the
    /// window are ignored. Totals cover every row; `page` only slices the
    /// returned rows.
    #[must_use]
    pub fn build(
        opening_balance: Decimal,
        entries: &[LedgerEntryView],
        period: &LedgerPeriod,
        page: Option<PageRequest>,
    ) -> LedgerReport {
        let mut window: Vec<&LedgerEntryView> =
            entries.iter().filter(|e| period.contains(e.date)).collect();
        window.sort_by_key(|e| (e.date, e.entry_id));

        let mut balance = RunningBalance::opening(opening_balance);
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;
        let mut rows = Vec::new();

        for entry in window {
            let mut subjects: Vec<&LedgerLineView> =
                entry.lines.iter().filter(|l| l.is_subject).collect();
            subjects.sort_by_key(|l| l.line_id);

            for subject in subjects {
                let display_side = subject.side.opposite();
                let mut counterparts: Vec<&LedgerLineView> = entry
                    .lines
                    .iter()
                    .filter(|l| l.side == display_side)
                    .collect();
                counterparts.sort_by_key(|l| l.line_id);

                let change = subject.signed_change();
                balance = balance.next(change);

                match display_side {
                    EntrySide::Debit => total_debits += subject.amount,
                    EntrySide::Credit => total_credits += subject.amount,
                }

                rows.push(LedgerRow {
                    entry_id: entry.entry_id,
                    line_id: subject.line_id,
                    date: entry.date,
                    description: entry.description.clone(),
                    display_side,
                    counterparts: counterparts.iter().map(|l| l.label.clone()).collect(),
                    amount: subject.amount,
                    signed_change: change,
                    current_balance: balance.current_balance,
                });
            }
        }

        let total_rows = u64::try_from(rows.len()).unwrap_or(u64::MAX);
        let (rows, page) = match page {
            Some(request) => {
                let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
                let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
                let sliced = rows.into_iter().skip(offset).take(limit).collect();
                let response =
                    PageResponse::new(sliced, request.page, request.per_page, total_rows);
                (response.data, Some(response.meta))
            }
            None => (rows, None),
        };

        LedgerReport {
            rows,
            opening_balance,
            total_debits,
            total_credits,
            total_balance: balance.current_balance,
            total_rows,
            page,
        }
    }
}
