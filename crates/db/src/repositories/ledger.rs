//! Ledger repository: loads subject lines and hands them to the report
//! builder.

use std::collections::{BTreeMap, HashMap, HashSet};

use rentledger_core::ledger::{AccountNature, AccountType, LedgerError};
use rentledger_core::reports::{
    LedgerBuilder, LedgerEntryView, LedgerLineView, LedgerMode, LedgerPeriod, LedgerQuery,
    LedgerReport,
};
use rentledger_shared::types::{JournalEntryId, JournalLineId};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::db_err;
use crate::entities::{
    company_bank_accounts, gl_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::PartyType,
};

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

/// Chart of accounts used to label lines and resolve their nature.
struct Chart {
    accounts: HashMap<Uuid, gl_accounts::Model>,
    banks: HashMap<Uuid, company_bank_accounts::Model>,
}

impl Chart {
    async fn load<C: ConnectionTrait>(db: &C) -> Result<Self, LedgerError> {
        let accounts = gl_accounts::Entity::find()
            .all(db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let banks = company_bank_accounts::Entity::find()
            .all(db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();
        Ok(Self { accounts, banks })
    }

    fn effective_account(&self, line: &journal_lines::Model) -> Option<&gl_accounts::Model> {
        let id = line.gl_account_id.or_else(|| {
            line.company_bank_account_id
                .and_then(|bank| self.banks.get(&bank))
                .map(|bank| bank.gl_account_id)
        })?;
        self.accounts.get(&id)
    }

    fn label(&self, line: &journal_lines::Model) -> String {
        if let Some(account) = line.gl_account_id.and_then(|id| self.accounts.get(&id)) {
            return account.label();
        }
        if let Some(bank) = line
            .company_bank_account_id
            .and_then(|id| self.banks.get(&id))
        {
            return bank.name.clone();
        }
        line.counterparty_label.clone().unwrap_or_default()
    }

    fn view(&self, line: &journal_lines::Model, is_subject: bool) -> LedgerLineView {
        let nature = self
            .effective_account(line)
            .map_or(AccountNature::Debit, |account| {
                AccountNature::from(AccountType::from(account.account_type))
            });
        LedgerLineView {
            line_id: JournalLineId::from_uuid(line.id),
            side: line.side.into(),
            amount: line.amount,
            label: self.label(line),
            nature,
            is_subject,
        }
    }
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the ledger of an account or an owner for a period.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when the start is after the end, `AccountNotFound`
    /// for an unknown subject account.
    #[instrument(skip(self))]
    pub async fn get_ledger(&self, query: LedgerQuery) -> Result<LedgerReport, LedgerError> {
        let Some(start) = query.start_date else {
            return Ok(LedgerReport::empty());
        };
        let period = LedgerPeriod::resolve(start, query.end_date)?;
        let chart = Chart::load(&self.db).await?;
        let condition = subject_condition(&chart, query.mode)?;

        let mut subject_select = journal_lines::Entity::find()
            .find_also_related(journal_entries::Entity)
            .filter(condition);
        if let Some(end) = query.end_date {
            subject_select = subject_select.filter(journal_entries::Column::EntryDate.lte(end));
        }
        let subject_rows = subject_select
            .order_by_asc(journal_lines::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut opening: BTreeMap<Uuid, LedgerEntryView> = BTreeMap::new();
        let mut window_entries: BTreeMap<Uuid, journal_entries::Model> = BTreeMap::new();
        let mut subject_ids: HashSet<Uuid> = HashSet::new();

        for (line, entry) in subject_rows {
            let Some(entry) = entry else { continue };
            if period.is_opening(entry.entry_date) {
                opening
                    .entry(entry.id)
                    .or_insert_with(|| entry_view(&entry))
                    .lines
                    .push(chart.view(&line, true));
            } else if period.contains(entry.entry_date) {
                subject_ids.insert(line.id);
                window_entries.entry(entry.id).or_insert(entry);
            }
        }

        let opening_balance = LedgerBuilder::opening_balance(opening.values(), &period);

        let mut views: BTreeMap<Uuid, LedgerEntryView> = window_entries
            .iter()
            .map(|(id, entry)| (*id, entry_view(entry)))
            .collect();
        if !views.is_empty() {
            let entry_ids: Vec<Uuid> = views.keys().copied().collect();
            let lines = journal_lines::Entity::find()
                .filter(journal_lines::Column::EntryId.is_in(entry_ids))
                .order_by_asc(journal_lines::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err)?;
            for line in lines {
                if let Some(view) = views.get_mut(&line.entry_id) {
                    let is_subject = subject_ids.contains(&line.id);
                    view.lines.push(chart.view(&line, is_subject));
                }
            }
        }

        let views: Vec<LedgerEntryView> = views.into_values().collect();
        let report = LedgerBuilder::build(opening_balance, &views, &period, query.page);

        debug!(
            anchor = %period.anchor,
            rows = report.total_rows,
            opening_balance = %report.opening_balance,
            total_balance = %report.total_balance,
            "ledger built"
        );
        Ok(report)
    }
}

fn entry_view(entry: &journal_entries::Model) -> LedgerEntryView {
    LedgerEntryView {
        entry_id: JournalEntryId::from_uuid(entry.id),
        date: entry.entry_date,
        description: entry.description.clone(),
        lines: Vec::new(),
    }
}

fn subject_condition(chart: &Chart, mode: LedgerMode) -> Result<Condition, LedgerError> {
    match mode {
        LedgerMode::Accounts { gl_account_id } => {
            let id = gl_account_id.into_inner();
            if !chart.accounts.contains_key(&id) {
                return Err(LedgerError::AccountNotFound(id.to_string()));
            }
            let bank_ids: Vec<Uuid> = chart
                .banks
                .values()
                .filter(|bank| bank.gl_account_id == id)
                .map(|bank| bank.id)
                .collect();

            let mut condition = Condition::any().add(journal_lines::Column::GlAccountId.eq(id));
            if !bank_ids.is_empty() {
                condition =
                    condition.add(journal_lines::Column::CompanyBankAccountId.is_in(bank_ids));
            }
            Ok(condition)
        }
        LedgerMode::Owner {
            owner_id,
            property_id,
        } => Ok(Condition::all()
            .add(journal_lines::Column::PartyType.eq(PartyType::Owner))
            .add(journal_lines::Column::PartyClientId.eq(owner_id))
            .add_option(property_id.map(|id| journal_lines::Column::PropertyId.eq(id)))),
    }
}
