//! Journal engine tests: atomic creation, validation, reversal and deletion.

mod common;

use common::{date, setup};
use rentledger_core::ledger::{
    AccountRef, CreateJournalEntryInput, EntryKind, EntrySide, JournalLineInput, LedgerError,
    PartyType, SettleLinesInput, SettlementMatch,
};
use rentledger_db::entities::{
    journal_entries, journal_lines, journal_settlement_lines, journal_settlements,
};
use rentledger_shared::types::{JournalEntryId, JournalLineId};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_balanced_entry() {
    let ctx = setup().await;
    let owner = Uuid::now_v7();
    let bank = ctx.bank("OPERATING").await;
    let income = ctx.gl("4000").await;

    let created = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Rent for March",
            date(2026, 3, 1),
            vec![
                JournalLineInput::debit(AccountRef::BankAccount(bank), dec!(1200))
                    .with_party(PartyType::Owner, owner),
                JournalLineInput::credit(AccountRef::GlAccount(income), dec!(1000))
                    .with_party(PartyType::Owner, owner),
                JournalLineInput::credit(AccountRef::Counterparty("  Late fee  ".into()), dec!(200))
                    .with_memo("March late fee"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(created.lines.len(), 3);
    assert_eq!(created.totals.debit, dec!(1200));
    assert_eq!(created.totals.credit, dec!(1200));
    assert!(created.totals.is_balanced);
    assert_eq!(created.entry.entry_date, date(2026, 3, 1));
    assert!(created.lines.iter().all(|l| l.version == 0 && !l.is_settled));
    assert_eq!(created.lines[2].counterparty_label.as_deref(), Some("Late fee"));
    assert_eq!(created.lines[0].party_client_id, Some(owner));

    let loaded = ctx
        .journal
        .get_journal_entry(JournalEntryId::from_uuid(created.entry.id))
        .await
        .unwrap();
    assert_eq!(loaded.entry.id, created.entry.id);
    assert_eq!(loaded.totals.debit, dec!(1200));
    let ids: Vec<Uuid> = loaded.lines.iter().map(|l| l.id).collect();
    let created_ids: Vec<Uuid> = created.lines.iter().map(|l| l.id).collect();
    assert_eq!(ids, created_ids);
}

#[tokio::test]
async fn test_single_line_entry_rejected() {
    let ctx = setup().await;
    let cash = ctx.gl("1100").await;

    let result = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Lonely",
            date(2026, 3, 1),
            vec![JournalLineInput::debit(AccountRef::GlAccount(cash), dec!(10))],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::InsufficientLines)));
    assert_eq!(journal_entries::Entity::find().count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unbalanced_entry_rejected_without_writes() {
    let ctx = setup().await;
    let cash = ctx.gl("1100").await;
    let equity = ctx.gl("3000").await;

    let result = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Off by one",
            date(2026, 3, 1),
            vec![
                JournalLineInput::debit(AccountRef::GlAccount(cash), dec!(101)),
                JournalLineInput::credit(AccountRef::GlAccount(equity), dec!(100)),
            ],
        ))
        .await;

    match result {
        Err(LedgerError::UnbalancedEntry { debit, credit }) => {
            assert_eq!(debit, dec!(101));
            assert_eq!(credit, dec!(100));
        }
        other => panic!("expected UnbalancedEntry, got {other:?}"),
    }
    assert_eq!(journal_entries::Entity::find().count(&ctx.db).await.unwrap(), 0);
    assert_eq!(journal_lines::Entity::find().count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_zero_amount_line_rejected() {
    let ctx = setup().await;
    let cash = ctx.gl("1100").await;
    let equity = ctx.gl("3000").await;

    let result = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Nothing",
            date(2026, 3, 1),
            vec![
                JournalLineInput::debit(AccountRef::GlAccount(cash), dec!(0)),
                JournalLineInput::credit(AccountRef::GlAccount(equity), dec!(0)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::ZeroAmount)));
}

#[tokio::test]
async fn test_blank_counterparty_rejected() {
    let ctx = setup().await;
    let cash = ctx.gl("1100").await;

    let result = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Who?",
            date(2026, 3, 1),
            vec![
                JournalLineInput::debit(AccountRef::GlAccount(cash), dec!(5)),
                JournalLineInput::credit(AccountRef::Counterparty("   ".into()), dec!(5)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::EmptyCounterparty)));
}

#[tokio::test]
async fn test_unknown_accounts_rejected() {
    let ctx = setup().await;
    let cash = ctx.gl("1100").await;

    let unknown_gl = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Ghost account",
            date(2026, 3, 1),
            vec![
                JournalLineInput::debit(AccountRef::GlAccount(cash), dec!(5)),
                JournalLineInput::credit(AccountRef::GlAccount(Uuid::now_v7()), dec!(5)),
            ],
        ))
        .await;
    assert!(matches!(unknown_gl, Err(LedgerError::AccountNotFound(_))));

    let unknown_bank = ctx
        .journal
        .create_journal_entry(CreateJournalEntryInput::new(
            "Ghost bank",
            date(2026, 3, 1),
            vec![
                JournalLineInput::debit(AccountRef::BankAccount(Uuid::now_v7()), dec!(5)),
                JournalLineInput::credit(AccountRef::GlAccount(cash), dec!(5)),
            ],
        ))
        .await;
    assert!(matches!(unknown_bank, Err(LedgerError::BankAccountNotFound(_))));
    assert_eq!(journal_entries::Entity::find().count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_missing_entry() {
    let ctx = setup().await;
    let id = JournalEntryId::new();
    match ctx.journal.get_journal_entry(id).await {
        Err(LedgerError::EntryNotFound(missing)) => assert_eq!(missing, id.into_inner()),
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_entry_removes_lines_and_settlement_lines() {
    let ctx = setup().await;
    let charge = ctx
        .post(date(2026, 3, 1), "Rent due", "1200", "4000", dec!(900))
        .await;
    let receipt = ctx
        .post(date(2026, 3, 3), "Rent paid", "1000", "1200", dec!(900))
        .await;
    let other_receipt = ctx
        .post(date(2026, 3, 4), "Second payment", "1000", "1200", dec!(100))
        .await;

    ctx.settlements
        .settle_lines(SettleLinesInput {
            matches: vec![SettlementMatch {
                debit_line_id: charge.lines[0].id,
                credit_line_id: receipt.lines[1].id,
                amount: dec!(800),
                note: None,
            }],
            note: None,
        })
        .await
        .unwrap();
    ctx.settlements
        .settle_lines(SettleLinesInput {
            matches: vec![SettlementMatch {
                debit_line_id: charge.lines[0].id,
                credit_line_id: other_receipt.lines[1].id,
                amount: dec!(100),
                note: None,
            }],
            note: None,
        })
        .await
        .unwrap();

    ctx.journal
        .delete_journal_entry(JournalEntryId::from_uuid(receipt.entry.id))
        .await
        .unwrap();

    assert!(matches!(
        ctx.journal
            .get_journal_entry(JournalEntryId::from_uuid(receipt.entry.id))
            .await,
        Err(LedgerError::EntryNotFound(_))
    ));
    // The settlement against the deleted receipt goes away entirely; the
    // other settlement is untouched.
    assert_eq!(journal_settlements::Entity::find().count(&ctx.db).await.unwrap(), 1);
    assert_eq!(
        journal_settlement_lines::Entity::find().count(&ctx.db).await.unwrap(),
        2
    );

    let charge_line = journal_lines::Entity::find_by_id(charge.lines[0].id)
        .one(&ctx.db)
        .await
        .unwrap()
        .expect("charge line survives");
    assert!(!charge_line.is_settled);
    assert!(charge_line.settled_at.is_none());
    assert_eq!(charge_line.version, 3);
    assert_eq!(
        ctx.settlements
            .remaining_amount(JournalLineId::from_uuid(charge.lines[0].id))
            .await
            .unwrap(),
        dec!(800)
    );

    ctx.journal
        .delete_journal_entry(JournalEntryId::from_uuid(charge.entry.id))
        .await
        .unwrap();
    assert_eq!(journal_settlements::Entity::find().count(&ctx.db).await.unwrap(), 0);
    assert_eq!(
        journal_settlement_lines::Entity::find().count(&ctx.db).await.unwrap(),
        0
    );
    let other_line = journal_lines::Entity::find_by_id(other_receipt.lines[1].id)
        .one(&ctx.db)
        .await
        .unwrap()
        .expect("other receipt line survives");
    assert!(!other_line.is_settled);
    assert_eq!(
        ctx.settlements
            .remaining_amount(JournalLineId::from_uuid(other_receipt.lines[1].id))
            .await
            .unwrap(),
        dec!(100)
    );
}

#[tokio::test]
async fn test_deleted_receipt_frees_the_charge_for_a_new_match() {
    let ctx = setup().await;
    let charge = ctx
        .post(date(2026, 3, 1), "Rent due", "1200", "4000", dec!(900))
        .await;
    let receipt = ctx
        .post(date(2026, 3, 3), "Rent paid", "1000", "1200", dec!(800))
        .await;
    ctx.settlements
        .settle_lines(SettleLinesInput {
            matches: vec![SettlementMatch {
                debit_line_id: charge.lines[0].id,
                credit_line_id: receipt.lines[1].id,
                amount: dec!(800),
                note: None,
            }],
            note: None,
        })
        .await
        .unwrap();

    ctx.journal
        .delete_journal_entry(JournalEntryId::from_uuid(receipt.entry.id))
        .await
        .unwrap();
    assert_eq!(
        ctx.settlements
            .remaining_amount(JournalLineId::from_uuid(charge.lines[0].id))
            .await
            .unwrap(),
        dec!(900)
    );

    let replacement = ctx
        .post(date(2026, 3, 5), "Rent paid again", "1000", "1200", dec!(900))
        .await;
    ctx.settlements
        .settle_lines(SettleLinesInput {
            matches: vec![SettlementMatch {
                debit_line_id: charge.lines[0].id,
                credit_line_id: replacement.lines[1].id,
                amount: dec!(900),
                note: None,
            }],
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(
        ctx.settlements
            .remaining_amount(JournalLineId::from_uuid(charge.lines[0].id))
            .await
            .unwrap(),
        dec!(0)
    );
}

#[tokio::test]
async fn test_delete_missing_entry() {
    let ctx = setup().await;
    let result = ctx.journal.delete_journal_entry(JournalEntryId::new()).await;
    assert!(matches!(result, Err(LedgerError::EntryNotFound(_))));
}

// ============================================================================
// Reversal
// ============================================================================

#[tokio::test]
async fn test_reverse_entry_swaps_sides_and_settles_both() {
    let ctx = setup().await;
    let original = ctx
        .post(date(2026, 3, 10), "Repair invoice", "5000", "2200", dec!(340))
        .await;

    let reversal = ctx
        .journal
        .reverse_journal_entry(
            JournalEntryId::from_uuid(original.entry.id),
            date(2026, 3, 12),
            Some("Duplicate invoice".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(EntryKind::from(reversal.entry.kind), EntryKind::Reversal);
    assert_eq!(reversal.entry.reverses_entry_id, Some(original.entry.id));
    assert_eq!(reversal.entry.entry_date, date(2026, 3, 12));
    assert!(reversal.entry.description.contains("Duplicate invoice"));
    assert!(reversal.totals.is_balanced);

    for (before, after) in original.lines.iter().zip(&reversal.lines) {
        assert_eq!(
            EntrySide::from(after.side),
            EntrySide::from(before.side).opposite()
        );
        assert_eq!(after.amount, before.amount);
        assert_eq!(after.gl_account_id, before.gl_account_id);
        assert!(after.is_settled);
    }

    let original = ctx
        .journal
        .get_journal_entry(JournalEntryId::from_uuid(original.entry.id))
        .await
        .unwrap();
    assert!(original.lines.iter().all(|l| l.is_settled && l.settled_at.is_some()));
}

#[tokio::test]
async fn test_entry_reversed_only_once() {
    let ctx = setup().await;
    let original = ctx
        .post(date(2026, 3, 10), "Owner draw", "3000", "1100", dec!(60))
        .await;
    let id = JournalEntryId::from_uuid(original.entry.id);

    ctx.journal
        .reverse_journal_entry(id, date(2026, 3, 11), None)
        .await
        .unwrap();
    let again = ctx
        .journal
        .reverse_journal_entry(id, date(2026, 3, 11), None)
        .await;

    match again {
        Err(LedgerError::AlreadyReversed(reversed)) => assert_eq!(reversed, original.entry.id),
        other => panic!("expected AlreadyReversed, got {other:?}"),
    }
    assert_eq!(journal_entries::Entity::find().count(&ctx.db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_schema_rejects_a_second_reversal_of_the_same_entry() {
    let ctx = setup().await;
    let original = ctx
        .post(date(2026, 3, 10), "Owner draw", "3000", "1100", dec!(60))
        .await;
    ctx.journal
        .reverse_journal_entry(JournalEntryId::from_uuid(original.entry.id), date(2026, 3, 11), None)
        .await
        .unwrap();

    // A writer that passed the existence check before the first reversal
    // committed still inserts a row pointing at the same entry.
    let equity = ctx.gl("3000").await;
    let petty_cash = ctx.gl("1100").await;
    let mut racing = CreateJournalEntryInput::new(
        "Reversal: Owner draw",
        date(2026, 3, 11),
        vec![
            JournalLineInput::debit(AccountRef::GlAccount(petty_cash), dec!(60)),
            JournalLineInput::credit(AccountRef::GlAccount(equity), dec!(60)),
        ],
    )
    .with_kind(EntryKind::Reversal);
    racing.reverses_entry_id = Some(original.entry.id);

    match ctx.journal.create_journal_entry(racing).await {
        Err(LedgerError::AlreadyReversed(reversed)) => assert_eq!(reversed, original.entry.id),
        other => panic!("expected AlreadyReversed, got {other:?}"),
    }
    assert_eq!(journal_entries::Entity::find().count(&ctx.db).await.unwrap(), 2);
    assert_eq!(journal_lines::Entity::find().count(&ctx.db).await.unwrap(), 4);
}
