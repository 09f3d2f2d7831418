//! Ledger service for journal-entry validation.
//!
//! Pure business logic; the db crate runs it before opening a transaction.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{AccountRef, CreateJournalEntryInput, EntrySide, EntryTotals, JournalLineInput};

/// Ledger service for journal-entry validation.
pub struct LedgerService;

impl LedgerService {
    /// Validate a journal entry before persisting.
    ///
    /// 1. At least 2 lines
    /// 2. Every amount positive
    /// 3. Counterparty labels non-blank
    /// 4. Every referenced account exists (`account_validator`)
    /// 5. Debits equal credits
    ///
    /// # Errors
    ///
    /// Returns the first `LedgerError` encountered, in the order above.
    pub fn validate_entry<A>(
        input: &CreateJournalEntryInput,
        account_validator: A,
    ) -> Result<EntryTotals, LedgerError>
    where
        A: Fn(&AccountRef) -> Result<(), LedgerError>,
    {
        if input.lines.len() < 2 {
            return Err(LedgerError::InsufficientLines);
        }

        for line in &input.lines {
            Self::validate_amount(line.amount)?;
            if let AccountRef::Counterparty(label) = &line.account
                && label.trim().is_empty()
            {
                return Err(LedgerError::EmptyCounterparty);
            }
        }

        let totals = Self::calculate_totals(&input.lines);
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedEntry {
                debit: totals.debit,
                credit: totals.credit,
            });
        }

        for line in &input.lines {
            account_validator(&line.account)?;
        }

        Ok(totals)
    }

    /// Rejects zero and negative amounts.
    pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
        if amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        Ok(())
    }

    /// Calculate entry totals from lines.
    #[must_use]
    pub fn calculate_totals(lines: &[JournalLineInput]) -> EntryTotals {
        let side_sum = |side: EntrySide| -> Decimal {
            lines
                .iter()
                .filter(|l| l.side == side)
                .map(|l| l.amount)
                .sum()
        };
        EntryTotals::new(side_sum(EntrySide::Debit), side_sum(EntrySide::Credit))
    }
}
