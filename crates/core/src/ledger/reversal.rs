//! Reversing entries.
//!
//! A posted entry is never edited. It is cancelled by posting a mirror entry
//! with every side swapped.

use chrono::NaiveDate;
use uuid::Uuid;

use super::types::{CreateJournalEntryInput, EntryKind, JournalLineInput};

/// Input for creating a reversing entry.
#[derive(Debug, Clone)]
pub struct ReversalInput {
    /// The entry being reversed.
    pub original_entry_id: Uuid,
    /// Its description.
    pub original_description: String,
    /// Its lines.
    pub original_lines: Vec<JournalLineInput>,
    /// Date of the reversing entry.
    pub reversal_date: NaiveDate,
    /// Why the entry is reversed.
    pub reason: Option<String>,
}

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversing entry.
    ///
    /// Every line keeps its account, amount, party and links; only the side
    /// flips and the memo gets a `Reversal` prefix.
    #[must_use]
    pub fn create_reversal(input: &ReversalInput) -> CreateJournalEntryInput {
        let lines = input
            .original_lines
            .iter()
            .map(|line| JournalLineInput {
                side: line.side.opposite(),
                memo: Some(match &line.memo {
                    Some(memo) => format!("Reversal: {memo}"),
                    None => "Reversal".to_string(),
                }),
                ..line.clone()
            })
            .collect();

        let description = match &input.reason {
            Some(reason) => format!(
                "Reversal of {}. Reason: {reason}",
                input.original_description
            ),
            None => format!("Reversal of {}", input.original_description),
        };

        CreateJournalEntryInput {
            description,
            entry_date: input.reversal_date,
            kind: EntryKind::Reversal,
            reverses_entry_id: Some(input.original_entry_id),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::service::LedgerService;
    use crate::ledger::types::{AccountRef, EntrySide, PartyType};
    use rust_decimal_macros::dec;

    fn input() -> ReversalInput {
        ReversalInput {
            original_entry_id: Uuid::new_v4(),
            original_description: "March rent".to_string(),
            original_lines: vec![
                JournalLineInput::debit(AccountRef::BankAccount(Uuid::new_v4()), dec!(1200))
                    .with_memo("Bank"),
                JournalLineInput::credit(AccountRef::GlAccount(Uuid::new_v4()), dec!(1200))
                    .with_party(PartyType::Owner, Uuid::new_v4()),
            ],
            reversal_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            reason: Some("Duplicate".to_string()),
        }
    }

    #[test]
    fn test_sides_swapped_everything_else_kept() {
        let input = input();
        let reversal = ReversalService::create_reversal(&input);

        assert_eq!(reversal.kind, EntryKind::Reversal);
        assert_eq!(reversal.reverses_entry_id, Some(input.original_entry_id));
        assert_eq!(reversal.lines.len(), 2);
        assert_eq!(reversal.lines[0].side, EntrySide::Credit);
        assert_eq!(reversal.lines[1].side, EntrySide::Debit);
        assert_eq!(reversal.lines[0].account, input.original_lines[0].account);
        assert_eq!(reversal.lines[1].party_type, Some(PartyType::Owner));
        assert_eq!(reversal.lines[0].memo.as_deref(), Some("Reversal: Bank"));
        assert_eq!(reversal.lines[1].memo.as_deref(), Some("Reversal"));
        assert_eq!(reversal.description, "Reversal of March rent. Reason: Duplicate");
    }

    #[test]
    fn test_reversal_of_balanced_entry_is_balanced() {
        let reversal = ReversalService::create_reversal(&input());
        let totals = LedgerService::validate_entry(&reversal, |_| Ok(())).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debit, dec!(1200));
    }
}
