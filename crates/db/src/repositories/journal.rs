//! Journal repository: atomic creation, reversal and deletion of entries.

use std::collections::HashSet;

use chrono::NaiveDate;
use rentledger_core::ledger::{
    AccountRef, CreateJournalEntryInput, EntryTotals, JournalLineInput, LedgerError,
    LedgerService, LineLinks, ReversalInput, ReversalService,
};
use rentledger_shared::types::{JournalEntryId, JournalLineId};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::settlement::matched_amount_in;
use super::{db_err, now};
use crate::entities::{
    company_bank_accounts, gl_accounts, journal_entries, journal_lines, journal_settlement_lines,
    journal_settlements,
    sea_orm_active_enums::{EntryKind, EntrySide, PartyType},
};

/// A journal entry with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryWithLines {
    /// The entry.
    pub entry: journal_entries::Model,
    /// Its lines, in id (creation) order.
    pub lines: Vec<journal_lines::Model>,
    /// Debit and credit totals.
    pub totals: EntryTotals,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a balanced journal entry and its lines in one transaction.
    ///
    /// # Errors
    ///
    /// `InsufficientLines`, `ZeroAmount`, `NegativeAmount`,
    /// `EmptyCounterparty`, `UnbalancedEntry` before anything is written;
    /// `AccountNotFound`/`BankAccountNotFound` for unknown accounts.
    #[instrument(skip(self, input), fields(description = %input.description, lines = input.lines.len()))]
    pub async fn create_journal_entry(
        &self,
        input: CreateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let created = insert_entry_in(&txn, &input).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            entry_id = %created.entry.id,
            amount = %created.totals.debit,
            "journal entry created"
        );
        Ok(created)
    }

    /// Loads an entry with its lines.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` if the entry does not exist.
    pub async fn get_journal_entry(
        &self,
        id: JournalEntryId,
    ) -> Result<JournalEntryWithLines, LedgerError> {
        load_entry_in(&self.db, id.into_inner()).await
    }

    /// Hard-deletes an entry, its lines and every settlement touching them.
    /// Counterpart lines of those settlements are reopened.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` if the entry does not exist.
    #[instrument(skip(self), fields(entry_id = %id))]
    pub async fn delete_journal_entry(&self, id: JournalEntryId) -> Result<(), LedgerError> {
        let id = id.into_inner();
        let txn = self.db.begin().await.map_err(db_err)?;

        journal_entries::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::EntryNotFound(id))?;
        delete_entries_in(&txn, &[id]).await?;

        txn.commit().await.map_err(db_err)?;
        info!("journal entry deleted");
        Ok(())
    }

    /// Posts a reversing entry dated `date`.
    ///
    /// Lines of both entries are marked settled.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` if the entry does not exist, `AlreadyReversed` if it
    /// already has a reversal.
    #[instrument(skip(self, reason), fields(entry_id = %id))]
    pub async fn reverse_journal_entry(
        &self,
        id: JournalEntryId,
        date: NaiveDate,
        reason: Option<String>,
    ) -> Result<JournalEntryWithLines, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let reversal = reverse_entry_in(&txn, id.into_inner(), date, reason).await?;
        txn.commit().await.map_err(db_err)?;

        info!(reversal_id = %reversal.entry.id, "journal entry reversed");
        Ok(reversal)
    }
}

/// Validates and inserts an entry with its lines on `db`.
pub(crate) async fn insert_entry_in<C: ConnectionTrait>(
    db: &C,
    input: &CreateJournalEntryInput,
) -> Result<JournalEntryWithLines, LedgerError> {
    if input.lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut gl_ids = Vec::new();
    let mut bank_ids = Vec::new();
    for line in &input.lines {
        match &line.account {
            AccountRef::GlAccount(id) => gl_ids.push(*id),
            AccountRef::BankAccount(id) => bank_ids.push(*id),
            AccountRef::Counterparty(_) => {}
        }
    }
    let known_gl = existing_ids_in::<_, gl_accounts::Entity>(db, gl_ids, gl_accounts::Column::Id)
        .await?;
    let known_banks = existing_ids_in::<_, company_bank_accounts::Entity>(
        db,
        bank_ids,
        company_bank_accounts::Column::Id,
    )
    .await?;

    let totals = LedgerService::validate_entry(input, |account| match account {
        AccountRef::GlAccount(id) if !known_gl.contains(id) => {
            Err(LedgerError::AccountNotFound(id.to_string()))
        }
        AccountRef::BankAccount(id) if !known_banks.contains(id) => {
            Err(LedgerError::BankAccountNotFound(id.to_string()))
        }
        _ => Ok(()),
    })?;

    let created_at = now();
    let entry = journal_entries::ActiveModel {
        id: Set(JournalEntryId::new().into_inner()),
        description: Set(input.description.clone()),
        entry_date: Set(input.entry_date),
        kind: Set(EntryKind::from(input.kind)),
        reverses_entry_id: Set(input.reverses_entry_id),
        created_at: Set(created_at),
    }
    .insert(db)
    .await
    .map_err(|err| match (err.sql_err(), input.reverses_entry_id) {
        // Only `reverses_entry_id` carries a unique index besides the key.
        (Some(SqlErr::UniqueConstraintViolation(_)), Some(reversed)) => {
            LedgerError::AlreadyReversed(reversed)
        }
        _ => db_err(err),
    })?;

    let mut lines = Vec::with_capacity(input.lines.len());
    for line in &input.lines {
        let (gl_account_id, company_bank_account_id, counterparty_label) = match &line.account {
            AccountRef::GlAccount(id) => (Some(*id), None, None),
            AccountRef::BankAccount(id) => (None, Some(*id), None),
            AccountRef::Counterparty(label) => (None, None, Some(label.trim().to_string())),
        };
        let model = journal_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            entry_id: Set(entry.id),
            side: Set(EntrySide::from(line.side)),
            amount: Set(line.amount),
            gl_account_id: Set(gl_account_id),
            company_bank_account_id: Set(company_bank_account_id),
            counterparty_label: Set(counterparty_label),
            party_type: Set(line.party_type.map(PartyType::from)),
            party_client_id: Set(line.party_client_id),
            property_id: Set(line.links.property_id),
            unit_id: Set(line.links.unit_id),
            maintenance_id: Set(line.links.maintenance_id),
            rent_agreement_id: Set(line.links.rent_agreement_id),
            payment_id: Set(line.links.payment_id),
            security_deposit_id: Set(line.links.security_deposit_id),
            memo: Set(line.memo.clone()),
            is_settled: Set(false),
            settled_at: Set(None),
            version: Set(0),
            created_at: Set(created_at),
        }
        .insert(db)
        .await
        .map_err(db_err)?;
        lines.push(model);
    }

    debug!(entry_id = %entry.id, lines = lines.len(), "journal entry inserted");
    Ok(JournalEntryWithLines {
        entry,
        lines,
        totals,
    })
}

async fn existing_ids_in<C, E>(
    db: &C,
    ids: Vec<Uuid>,
    id_column: E::Column,
) -> Result<HashSet<Uuid>, LedgerError>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    if ids.is_empty() {
        return Ok(HashSet::new());
    }
    let found: Vec<Uuid> = E::find()
        .select_only()
        .column(id_column)
        .filter(id_column.is_in(ids))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(found.into_iter().collect())
}

/// Loads an entry and its lines.
pub(crate) async fn load_entry_in<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<JournalEntryWithLines, LedgerError> {
    let entry = journal_entries::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::EntryNotFound(id))?;
    let lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(id))
        .order_by_asc(journal_lines::Column::Id)
        .all(db)
        .await
        .map_err(db_err)?;

    let inputs: Vec<JournalLineInput> = lines
        .iter()
        .map(line_to_input)
        .collect::<Result<_, _>>()?;
    let totals = LedgerService::calculate_totals(&inputs);

    Ok(JournalEntryWithLines {
        entry,
        lines,
        totals,
    })
}

/// Rebuilds the input a stored line was created from.
pub(crate) fn line_to_input(line: &journal_lines::Model) -> Result<JournalLineInput, LedgerError> {
    let account = line
        .account_ref()
        .ok_or_else(|| LedgerError::Internal(format!("line {} has no posting target", line.id)))?;
    Ok(JournalLineInput {
        side: line.side.into(),
        amount: line.amount,
        account,
        party_type: line.party_type.map(Into::into),
        party_client_id: line.party_client_id,
        links: LineLinks {
            property_id: line.property_id,
            unit_id: line.unit_id,
            maintenance_id: line.maintenance_id,
            rent_agreement_id: line.rent_agreement_id,
            payment_id: line.payment_id,
            security_deposit_id: line.security_deposit_id,
        },
        memo: line.memo.clone(),
    })
}

/// Posts the reversal of `entry_id` and marks both entries' lines settled.
pub(crate) async fn reverse_entry_in<C: ConnectionTrait>(
    db: &C,
    entry_id: Uuid,
    date: NaiveDate,
    reason: Option<String>,
) -> Result<JournalEntryWithLines, LedgerError> {
    let original = load_entry_in(db, entry_id).await?;

    let existing = journal_entries::Entity::find()
        .filter(journal_entries::Column::ReversesEntryId.eq(entry_id))
        .one(db)
        .await
        .map_err(db_err)?;
    if existing.is_some() {
        return Err(LedgerError::AlreadyReversed(entry_id));
    }

    let original_lines = original
        .lines
        .iter()
        .map(line_to_input)
        .collect::<Result<Vec<_>, _>>()?;
    let reversal = ReversalService::create_reversal(&ReversalInput {
        original_entry_id: entry_id,
        original_description: original.entry.description.clone(),
        original_lines,
        reversal_date: date,
        reason,
    });

    let created = insert_entry_in(db, &reversal).await?;
    mark_entries_settled_in(db, &[entry_id, created.entry.id]).await?;
    load_entry_in(db, created.entry.id).await
}

async fn mark_entries_settled_in<C: ConnectionTrait>(
    db: &C,
    entry_ids: &[Uuid],
) -> Result<(), LedgerError> {
    journal_lines::Entity::update_many()
        .col_expr(journal_lines::Column::IsSettled, Expr::value(true))
        .col_expr(journal_lines::Column::SettledAt, Expr::value(now()))
        .col_expr(
            journal_lines::Column::Version,
            Expr::col(journal_lines::Column::Version).add(1),
        )
        .filter(journal_lines::Column::EntryId.is_in(entry_ids.to_vec()))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Deletes entries, their lines, and every settlement touching those lines.
///
/// Counterpart lines that survive get their match state recomputed: a line
/// with an unmatched remainder is no longer settled.
pub(crate) async fn delete_entries_in<C: ConnectionTrait>(
    db: &C,
    entry_ids: &[Uuid],
) -> Result<(), LedgerError> {
    if entry_ids.is_empty() {
        return Ok(());
    }

    let line_ids: Vec<Uuid> = journal_lines::Entity::find()
        .select_only()
        .column(journal_lines::Column::Id)
        .filter(journal_lines::Column::EntryId.is_in(entry_ids.to_vec()))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_err)?;

    if !line_ids.is_empty() {
        let touched: Vec<Uuid> = journal_settlement_lines::Entity::find()
            .select_only()
            .column(journal_settlement_lines::Column::SettlementId)
            .filter(journal_settlement_lines::Column::LineId.is_in(line_ids.clone()))
            .into_tuple()
            .all(db)
            .await
            .map_err(db_err)?;
        let touched: Vec<Uuid> = touched
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        if !touched.is_empty() {
            let deleted: HashSet<Uuid> = line_ids.iter().copied().collect();
            let survivors: Vec<Uuid> = journal_settlement_lines::Entity::find()
                .select_only()
                .column(journal_settlement_lines::Column::LineId)
                .filter(journal_settlement_lines::Column::SettlementId.is_in(touched.clone()))
                .into_tuple::<Uuid>()
                .all(db)
                .await
                .map_err(db_err)?
                .into_iter()
                .filter(|id| !deleted.contains(id))
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();

            journal_settlement_lines::Entity::delete_many()
                .filter(journal_settlement_lines::Column::SettlementId.is_in(touched.clone()))
                .exec(db)
                .await
                .map_err(db_err)?;
            journal_settlements::Entity::delete_many()
                .filter(journal_settlements::Column::Id.is_in(touched))
                .exec(db)
                .await
                .map_err(db_err)?;

            restore_match_state_in(db, survivors).await?;
        }
    }

    journal_lines::Entity::delete_many()
        .filter(journal_lines::Column::EntryId.is_in(entry_ids.to_vec()))
        .exec(db)
        .await
        .map_err(db_err)?;
    journal_entries::Entity::delete_many()
        .filter(journal_entries::Column::Id.is_in(entry_ids.to_vec()))
        .exec(db)
        .await
        .map_err(db_err)?;

    debug!(entries = entry_ids.len(), "journal entries deleted");
    Ok(())
}

/// Bumps the version of lines whose settlements were removed and clears
/// `is_settled` where a remainder is open again. Lines of reversed or
/// reversing entries stay settled.
async fn restore_match_state_in<C: ConnectionTrait>(
    db: &C,
    line_ids: Vec<Uuid>,
) -> Result<(), LedgerError> {
    if line_ids.is_empty() {
        return Ok(());
    }

    let lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::Id.is_in(line_ids))
        .find_also_related(journal_entries::Entity)
        .all(db)
        .await
        .map_err(db_err)?;
    if lines.is_empty() {
        return Ok(());
    }

    let entry_ids: Vec<Uuid> = lines.iter().map(|(line, _)| line.entry_id).collect();
    let reversed: HashSet<Uuid> = journal_entries::Entity::find()
        .filter(journal_entries::Column::ReversesEntryId.is_in(entry_ids))
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .filter_map(|entry| entry.reverses_entry_id)
        .collect();

    for (line, entry) in lines {
        let closed_by_reversal = reversed.contains(&line.entry_id)
            || entry.is_some_and(|e| e.reverses_entry_id.is_some());
        let matched = matched_amount_in(db, line.id).await?;
        let reopen = !closed_by_reversal && line.amount - matched > Decimal::ZERO;

        let mut update = journal_lines::Entity::update_many()
            .col_expr(
                journal_lines::Column::Version,
                Expr::col(journal_lines::Column::Version).add(1),
            )
            .filter(journal_lines::Column::Id.eq(line.id));
        if reopen {
            update = update
                .col_expr(journal_lines::Column::IsSettled, Expr::value(false))
                .col_expr(
                    journal_lines::Column::SettledAt,
                    Expr::value(Option::<DateTimeWithTimeZone>::None),
                );
        }
        update.exec(db).await.map_err(db_err)?;
    }
    Ok(())
}
