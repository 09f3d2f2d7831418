//! Report repository: trial balance over the chart of accounts.

use std::collections::HashMap;

use rentledger_core::ledger::{AccountType, LedgerError};
use rentledger_core::reports::{
    AccountInfo, Posting, TrialBalanceQuery, TrialBalanceReport, TrialBalanceService,
};
use rentledger_shared::types::GlAccountId;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::db_err;
use crate::entities::{company_bank_accounts, gl_accounts, journal_entries, journal_lines};

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Debit and credit totals per GL account for an optional date range.
    ///
    /// Bank lines count towards the GL account their bank maps to;
    /// counterparty lines go to the unallocated bucket.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when the start is after the end.
    #[instrument(skip(self))]
    pub async fn get_trial_balance(
        &self,
        query: TrialBalanceQuery,
    ) -> Result<TrialBalanceReport, LedgerError> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date)
            && start > end
        {
            return Err(LedgerError::InvalidDateRange { start, end });
        }

        let accounts: Vec<AccountInfo> = gl_accounts::Entity::find()
            .order_by_asc(gl_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|account| AccountInfo {
                id: GlAccountId::from_uuid(account.id),
                code: account.code,
                name: account.name,
                account_type: AccountType::from(account.account_type),
            })
            .collect();

        let bank_to_gl: HashMap<Uuid, Uuid> = company_bank_accounts::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|bank| (bank.id, bank.gl_account_id))
            .collect();

        let mut select = journal_lines::Entity::find().join(
            JoinType::InnerJoin,
            journal_lines::Relation::JournalEntries.def(),
        );
        if let Some(start) = query.start_date {
            select = select.filter(journal_entries::Column::EntryDate.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(journal_entries::Column::EntryDate.lte(end));
        }
        let lines = select
            .order_by_asc(journal_lines::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let postings: Vec<Posting> = lines
            .iter()
            .map(|line| Posting {
                account_id: line
                    .gl_account_id
                    .or_else(|| {
                        line.company_bank_account_id
                            .and_then(|bank| bank_to_gl.get(&bank).copied())
                    })
                    .map(GlAccountId::from_uuid),
                side: line.side.into(),
                amount: line.amount,
            })
            .collect();

        let report = TrialBalanceService::aggregate(
            accounts,
            postings,
            query.start_date,
            query.end_date,
        );
        debug!(
            lines = lines.len(),
            total_debits = %report.total_debits,
            total_credits = %report.total_credits,
            "trial balance built"
        );
        Ok(report)
    }
}
