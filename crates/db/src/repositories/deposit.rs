//! Security deposit repository: intake and refund workflows.
//!
//! Each workflow runs in one transaction and composes the journal and
//! settlement helpers on that transaction.

use std::collections::HashSet;

use rentledger_core::deposit::{
    CreateDepositInput, DepositAccounts, DepositParties, DepositService, DepositStatus,
    RefundDepositInput,
};
use rentledger_core::ledger::{
    AccountRef, EntryKind as DomainEntryKind, EntrySide as DomainEntrySide, LedgerError,
    LedgerService, SettlementMatch,
};
use rentledger_shared::LedgerConfig;
use rentledger_shared::types::SecurityDepositId;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::account::{account_by_code_in, bank_account_by_code_in};
use super::journal::{insert_entry_in, reverse_entry_in};
use super::settlement::{live_settled_lines_in, release_settlements_in, settle_in};
use super::{db_err, now};
use crate::entities::{
    journal_entries, journal_lines, payments, rent_agreements, security_deposits,
    sea_orm_active_enums::{PaymentStatus, PaymentType},
};

const READJUSTMENT_REASON: &str = "Security deposit re-adjustment";

/// Security deposit repository.
#[derive(Debug, Clone)]
pub struct DepositRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl DepositRepository {
    /// Creates a new deposit repository posting to the accounts named in
    /// `config`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Records a received deposit: payment, deposit row and intake entry.
    ///
    /// # Errors
    ///
    /// `ZeroAmount`/`NegativeAmount`, `RentAgreementNotFound`, or
    /// `AccountNotFound`/`BankAccountNotFound` when the configured accounts
    /// are missing.
    #[instrument(skip(self, input), fields(rent_agreement_id = %input.rent_agreement_id, amount = %input.amount))]
    pub async fn create_deposit(
        &self,
        input: CreateDepositInput,
    ) -> Result<security_deposits::Model, LedgerError> {
        LedgerService::validate_amount(input.amount)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let accounts = deposit_accounts_in(&txn, &self.config).await?;

        let agreement = rent_agreements::Entity::find_by_id(input.rent_agreement_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::RentAgreementNotFound(input.rent_agreement_id))?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            rent_agreement_id: Set(agreement.id),
            amount: Set(input.amount),
            payment_type: Set(PaymentType::Insurance),
            status: Set(PaymentStatus::Paid),
            paid_at: Set(Some(input.received_at)),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let created_at = now();
        let deposit = security_deposits::ActiveModel {
            id: Set(SecurityDepositId::new().into_inner()),
            amount: Set(input.amount),
            deducted_amount: Set(Decimal::ZERO),
            refunded_amount: Set(Decimal::ZERO),
            deduction_reason: Set(None),
            status: Set(DepositStatus::Active.into()),
            renter_id: Set(agreement.renter_id),
            unit_id: Set(agreement.unit_id),
            property_id: Set(agreement.property_id),
            rent_agreement_id: Set(agreement.id),
            payment_id: Set(None),
            intake_entry_id: Set(None),
            liability_line_id: Set(None),
            received_at: Set(input.received_at),
            refunded_at: Set(None),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let intake = DepositService::intake_entry(
            &parties(&deposit),
            &accounts,
            input.amount,
            input.received_at,
            payment.id,
        )?;
        let entry = insert_entry_in(&txn, &intake).await?;
        let anchor = entry
            .lines
            .iter()
            .find(|line| DomainEntrySide::from(line.side) == DomainEntrySide::Credit)
            .ok_or_else(|| LedgerError::Internal("intake entry has no credit line".to_string()))?;

        let mut active = deposit.into_active_model();
        active.payment_id = Set(Some(payment.id));
        active.intake_entry_id = Set(Some(entry.entry.id));
        active.liability_line_id = Set(Some(anchor.id));
        let deposit = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        info!(
            deposit_id = %deposit.id,
            payment_id = %payment.id,
            entry_id = %entry.entry.id,
            "security deposit received"
        );
        Ok(deposit)
    }

    /// Refunds and/or keeps a deposit.
    ///
    /// A repeated call re-adjusts the deposit: earlier refund, deduction and
    /// transfer entries are reversed and the settlements on the liability
    /// line released before the new entries are posted.
    ///
    /// # Errors
    ///
    /// `DepositNotFound`, `NegativeAmount`, or `InvalidTransition` when both
    /// amounts are zero or their sum exceeds the deposit.
    #[instrument(skip(self, input), fields(deposit_id = %input.deposit_id, refund = %input.refund, deduct = %input.deduct))]
    pub async fn refund_deposit(
        &self,
        input: RefundDepositInput,
    ) -> Result<security_deposits::Model, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let deposit = security_deposits::Entity::find_by_id(input.deposit_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::DepositNotFound(input.deposit_id))?;

        let plan = match DepositService::plan_refund(deposit.amount, &input) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(amount = %deposit.amount, error = %err, "deposit refund rejected");
                return Err(err);
            }
        };
        let anchor = deposit.liability_line_id.ok_or_else(|| {
            LedgerError::Internal(format!("deposit {} has no liability line", deposit.id))
        })?;
        let accounts = deposit_accounts_in(&txn, &self.config).await?;

        let prior = open_adjustments_in(&txn, deposit.id).await?;
        for entry_id in &prior {
            reverse_entry_in(
                &txn,
                *entry_id,
                input.refunded_at,
                Some(READJUSTMENT_REASON.to_string()),
            )
            .await?;
        }
        let released = release_settlements_in(&txn, anchor).await?;
        if !prior.is_empty() || released > 0 {
            debug!(
                reversed = prior.len(),
                released, "previous deposit adjustment undone"
            );
        }

        let entries = DepositService::adjustment_entries(
            &plan,
            &parties(&deposit),
            &accounts,
            input.refunded_at,
            input.reason.as_deref(),
        );
        for entry in &entries {
            let created = insert_entry_in(&txn, entry).await?;
            if !matches!(
                entry.kind,
                DomainEntryKind::DepositRefund | DomainEntryKind::DepositDeduction
            ) {
                continue;
            }
            let liability_line = created
                .lines
                .iter()
                .find(|line| {
                    line.account_ref()
                        == Some(AccountRef::GlAccount(accounts.liability_account_id))
                })
                .ok_or_else(|| {
                    LedgerError::Internal("adjustment entry has no liability line".to_string())
                })?;
            settle_in(
                &txn,
                &SettlementMatch {
                    debit_line_id: liability_line.id,
                    credit_line_id: anchor,
                    amount: liability_line.amount,
                    note: None,
                },
                Some(entry.description.clone()),
            )
            .await?;
        }

        let mut active = deposit.into_active_model();
        active.refunded_amount = Set(plan.refund);
        active.deducted_amount = Set(plan.deduct);
        active.deduction_reason = Set(input.reason.clone());
        active.status = Set(plan.status.into());
        active.refunded_at = Set(Some(input.refunded_at));
        active.updated_at = Set(now());
        let deposit = active.update(&txn).await.map_err(db_err)?;

        let settled = live_settled_lines_in(&txn, anchor).await?;
        journal_lines::Entity::update_many()
            .col_expr(journal_lines::Column::IsSettled, Expr::value(true))
            .col_expr(journal_lines::Column::SettledAt, Expr::value(now()))
            .col_expr(
                journal_lines::Column::Version,
                Expr::col(journal_lines::Column::Version).add(1),
            )
            .filter(journal_lines::Column::Id.is_in(settled))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        info!(
            status = plan.status.as_str(),
            entries = entries.len(),
            "security deposit refunded"
        );
        Ok(deposit)
    }

    /// Loads a deposit.
    ///
    /// # Errors
    ///
    /// `DepositNotFound` if it does not exist.
    pub async fn get_deposit(
        &self,
        id: SecurityDepositId,
    ) -> Result<security_deposits::Model, LedgerError> {
        let id = id.into_inner();
        security_deposits::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::DepositNotFound(id))
    }
}

fn parties(deposit: &security_deposits::Model) -> DepositParties {
    DepositParties {
        deposit_id: deposit.id,
        renter_id: deposit.renter_id,
        unit_id: deposit.unit_id,
        property_id: deposit.property_id,
        rent_agreement_id: deposit.rent_agreement_id,
    }
}

async fn deposit_accounts_in<C: ConnectionTrait>(
    db: &C,
    config: &LedgerConfig,
) -> Result<DepositAccounts, LedgerError> {
    let liability = account_by_code_in(db, &config.deposit_liability_code).await?;
    let forfeiture = account_by_code_in(db, &config.forfeiture_revenue_code).await?;
    let deposit_bank = bank_account_by_code_in(db, &config.deposit_bank_code).await?;
    let operating_bank = bank_account_by_code_in(db, &config.operating_bank_code).await?;
    Ok(DepositAccounts {
        deposit_bank_id: deposit_bank.id,
        operating_bank_id: operating_bank.id,
        liability_account_id: liability.id,
        forfeiture_account_id: forfeiture.id,
    })
}

/// Refund, deduction and transfer entries of a deposit that carry no
/// payment link and have not been reversed yet, oldest first.
async fn open_adjustments_in<C: ConnectionTrait>(
    db: &C,
    deposit_id: Uuid,
) -> Result<Vec<Uuid>, LedgerError> {
    let rows = journal_lines::Entity::find()
        .find_also_related(journal_entries::Entity)
        .filter(journal_lines::Column::SecurityDepositId.eq(deposit_id))
        .filter(journal_lines::Column::PaymentId.is_null())
        .order_by_asc(journal_lines::Column::EntryId)
        .all(db)
        .await
        .map_err(db_err)?;

    let mut seen = HashSet::new();
    let candidates: Vec<Uuid> = rows
        .into_iter()
        .filter_map(|(_, entry)| entry)
        .filter(|entry| DomainEntryKind::from(entry.kind).is_deposit_adjustment())
        .map(|entry| entry.id)
        .filter(|id| seen.insert(*id))
        .collect();
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let reversed: HashSet<Uuid> = journal_entries::Entity::find()
        .filter(journal_entries::Column::ReversesEntryId.is_in(candidates.clone()))
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .filter_map(|entry| entry.reverses_entry_id)
        .collect();

    Ok(candidates
        .into_iter()
        .filter(|id| !reversed.contains(id))
        .collect())
}
