//! Settlement repository: matching debit lines against credit lines.

use rentledger_core::ledger::{
    LedgerError, LineMatchState, PaymentStatus, SettleLinesInput, SettlementMatch,
    SettlementService,
};
use rentledger_shared::types::{JournalLineId, SettlementId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{db_err, now};
use crate::entities::{
    journal_lines, journal_settlement_lines, journal_settlements, sea_orm_active_enums::EntrySide,
};

/// A settlement with its two lines.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementWithLines {
    /// The settlement.
    pub settlement: journal_settlements::Model,
    /// Debit side first, then credit side.
    pub lines: Vec<journal_settlement_lines::Model>,
}

/// Settlement repository.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a batch of matches in one transaction.
    ///
    /// # Errors
    ///
    /// `LineNotFound`, `SideMismatch`, `ZeroAmount`/`NegativeAmount`,
    /// `OverMatch`, or `ConcurrentModification` when a line changed under us.
    /// Nothing is written when any match fails.
    #[instrument(skip(self, input), fields(matches = input.matches.len()))]
    pub async fn settle_lines(
        &self,
        input: SettleLinesInput,
    ) -> Result<Vec<SettlementWithLines>, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut created = Vec::with_capacity(input.matches.len());
        for request in &input.matches {
            created.push(settle_in(&txn, request, input.note.clone()).await?);
        }
        txn.commit().await.map_err(db_err)?;

        info!(settlements = created.len(), "lines settled");
        Ok(created)
    }

    /// Live matched amount on the payment's debit lines against `target`.
    ///
    /// # Errors
    ///
    /// Database errors only.
    #[instrument(skip(self))]
    pub async fn check_for_fully_paid_by_payment_id(
        &self,
        payment_id: Uuid,
        target: Decimal,
    ) -> Result<PaymentStatus, LedgerError> {
        let debit_lines: Vec<Uuid> = journal_lines::Entity::find()
            .filter(journal_lines::Column::PaymentId.eq(payment_id))
            .filter(journal_lines::Column::Side.eq(EntrySide::Debit))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|line| line.id)
            .collect();

        let mut matched = Decimal::ZERO;
        for line_id in debit_lines {
            matched += matched_amount_in(&self.db, line_id).await?;
        }
        Ok(SettlementService::payment_status(matched, target))
    }

    /// Unmatched amount left on a line.
    ///
    /// # Errors
    ///
    /// `LineNotFound` if the line does not exist.
    pub async fn remaining_amount(&self, line_id: JournalLineId) -> Result<Decimal, LedgerError> {
        let (line, _) = load_line_in(&self.db, line_id.into_inner()).await?;
        Ok(line.remaining())
    }
}

/// Match state of a line and the version it was read at.
async fn load_line_in<C: ConnectionTrait>(
    db: &C,
    line_id: Uuid,
) -> Result<(LineMatchState, i32), LedgerError> {
    let line = journal_lines::Entity::find_by_id(line_id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::LineNotFound(line_id))?;
    let matched = matched_amount_in(db, line_id).await?;
    let state = LineMatchState {
        line_id,
        side: line.side.into(),
        amount: line.amount,
        matched,
    };
    Ok((state, line.version))
}

/// Sum of matched amounts on a line, excluding released settlements.
pub(crate) async fn matched_amount_in<C: ConnectionTrait>(
    db: &C,
    line_id: Uuid,
) -> Result<Decimal, LedgerError> {
    let rows = journal_settlement_lines::Entity::find()
        .filter(journal_settlement_lines::Column::LineId.eq(line_id))
        .find_also_related(journal_settlements::Entity)
        .all(db)
        .await
        .map_err(db_err)?;

    Ok(rows
        .into_iter()
        .filter(|(_, settlement)| settlement.as_ref().is_some_and(|s| s.reversed_at.is_none()))
        .map(|(line, _)| line.amount_matched)
        .sum())
}

/// Validates and records one match, bumping both lines' versions.
pub(crate) async fn settle_in<C: ConnectionTrait>(
    db: &C,
    request: &SettlementMatch,
    note: Option<String>,
) -> Result<SettlementWithLines, LedgerError> {
    let (debit, debit_version) = load_line_in(db, request.debit_line_id).await?;
    let (credit, credit_version) = load_line_in(db, request.credit_line_id).await?;

    if let Err(err) = SettlementService::validate_match(&debit, &credit, request.amount) {
        warn!(
            debit_line_id = %request.debit_line_id,
            credit_line_id = %request.credit_line_id,
            amount = %request.amount,
            error = %err,
            "settlement rejected"
        );
        return Err(err);
    }

    let created_at = now();
    let settlement = journal_settlements::ActiveModel {
        id: Set(SettlementId::new().into_inner()),
        note: Set(note),
        reversed_at: Set(None),
        created_at: Set(created_at),
    }
    .insert(db)
    .await
    .map_err(db_err)?;

    let mut lines = Vec::with_capacity(2);
    for (line_id, side) in [
        (request.debit_line_id, EntrySide::Debit),
        (request.credit_line_id, EntrySide::Credit),
    ] {
        let model = journal_settlement_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            settlement_id: Set(settlement.id),
            line_id: Set(line_id),
            side: Set(side),
            amount_matched: Set(request.amount),
            note: Set(request.note.clone()),
            created_at: Set(created_at),
        }
        .insert(db)
        .await
        .map_err(db_err)?;
        lines.push(model);
    }

    bump_version_in(
        db,
        request.debit_line_id,
        debit_version,
        debit.remaining() - request.amount,
    )
    .await?;
    bump_version_in(
        db,
        request.credit_line_id,
        credit_version,
        credit.remaining() - request.amount,
    )
    .await?;

    debug!(settlement_id = %settlement.id, amount = %request.amount, "settlement recorded");
    Ok(SettlementWithLines { settlement, lines })
}

/// Compare-and-set on `version`; flags the line settled once nothing is
/// left to match.
async fn bump_version_in<C: ConnectionTrait>(
    db: &C,
    line_id: Uuid,
    expected_version: i32,
    remaining_after: Decimal,
) -> Result<(), LedgerError> {
    let mut update = journal_lines::Entity::update_many()
        .col_expr(
            journal_lines::Column::Version,
            Expr::col(journal_lines::Column::Version).add(1),
        )
        .filter(journal_lines::Column::Id.eq(line_id))
        .filter(journal_lines::Column::Version.eq(expected_version));
    if remaining_after <= Decimal::ZERO {
        update = update
            .col_expr(journal_lines::Column::IsSettled, Expr::value(true))
            .col_expr(journal_lines::Column::SettledAt, Expr::value(now()));
    }

    let result = update.exec(db).await.map_err(db_err)?;
    if result.rows_affected == 0 {
        warn!(%line_id, expected_version, "journal line modified concurrently");
        return Err(LedgerError::ConcurrentModification(line_id));
    }
    Ok(())
}

/// Releases every live settlement touching `line_id`.
///
/// Returns the number of settlements released.
pub(crate) async fn release_settlements_in<C: ConnectionTrait>(
    db: &C,
    line_id: Uuid,
) -> Result<u64, LedgerError> {
    let settlement_ids: Vec<Uuid> = journal_settlement_lines::Entity::find()
        .filter(journal_settlement_lines::Column::LineId.eq(line_id))
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|line| line.settlement_id)
        .collect();
    if settlement_ids.is_empty() {
        return Ok(0);
    }

    let result = journal_settlements::Entity::update_many()
        .col_expr(journal_settlements::Column::ReversedAt, Expr::value(now()))
        .filter(journal_settlements::Column::Id.is_in(settlement_ids))
        .filter(journal_settlements::Column::ReversedAt.is_null())
        .exec(db)
        .await
        .map_err(db_err)?;

    debug!(%line_id, released = result.rows_affected, "settlements released");
    Ok(result.rows_affected)
}

/// Lines reachable from `line_id` through its live settlements, including
/// `line_id` itself.
pub(crate) async fn live_settled_lines_in<C: ConnectionTrait>(
    db: &C,
    line_id: Uuid,
) -> Result<Vec<Uuid>, LedgerError> {
    let live: Vec<Uuid> = journal_settlement_lines::Entity::find()
        .filter(journal_settlement_lines::Column::LineId.eq(line_id))
        .find_also_related(journal_settlements::Entity)
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .filter(|(_, settlement)| settlement.as_ref().is_some_and(|s| s.reversed_at.is_none()))
        .map(|(line, _)| line.settlement_id)
        .collect();

    let mut lines = vec![line_id];
    if live.is_empty() {
        return Ok(lines);
    }
    let reachable = journal_settlement_lines::Entity::find()
        .filter(journal_settlement_lines::Column::SettlementId.is_in(live))
        .order_by_asc(journal_settlement_lines::Column::Id)
        .all(db)
        .await
        .map_err(db_err)?;
    for row in reachable {
        if !lines.contains(&row.line_id) {
            lines.push(row.line_id);
        }
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "settlement_tests.rs"]
mod tests;
