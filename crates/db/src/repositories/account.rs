//! Account repository for the chart of accounts and company bank accounts.

use std::collections::HashSet;

use rentledger_core::ledger::{self, AccountNature, LedgerError};
use rentledger_shared::types::{BankAccountId, GlAccountId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::journal::delete_entries_in;
use super::{db_err, now};
use crate::entities::{
    company_bank_accounts, gl_accounts, journal_lines, sea_orm_active_enums::AccountType,
};

/// Default chart of accounts: `(code, name, type)`.
pub const DEFAULT_CHART: &[(&str, &str, ledger::AccountType)] = &[
    ("1000", "Operating Bank", ledger::AccountType::Asset),
    ("1010", "Deposit Holding Bank", ledger::AccountType::Asset),
    ("1100", "Petty Cash", ledger::AccountType::Asset),
    ("1200", "Rent Receivable", ledger::AccountType::Asset),
    ("2100", "Tenant Security Deposits", ledger::AccountType::Liability),
    ("2200", "Owner Payables", ledger::AccountType::Liability),
    ("3000", "Owner Equity", ledger::AccountType::Equity),
    ("4000", "Rental Income", ledger::AccountType::Revenue),
    ("4100", "Management Fees", ledger::AccountType::Revenue),
    ("4300", "Forfeited Deposits", ledger::AccountType::Revenue),
    ("5000", "Maintenance Expense", ledger::AccountType::Expense),
];

/// Default company bank accounts: `(code, name, GL account code)`.
pub const DEFAULT_BANK_ACCOUNTS: &[(&str, &str, &str)] = &[
    ("OPERATING", "Operating Account", "1000"),
    ("DEPOSIT", "Security Deposit Account", "1010"),
];

/// Input for creating a GL account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (globally unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: ledger::AccountType,
}

/// Input for creating a company bank account.
#[derive(Debug, Clone)]
pub struct CreateBankAccountInput {
    /// Bank account code (globally unique).
    pub code: String,
    /// Bank account name.
    pub name: String,
    /// Asset GL account the bank account posts to.
    pub gl_account_id: GlAccountId,
}

/// What `seed_default_chart` created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// GL accounts created.
    pub accounts_created: usize,
    /// Bank accounts created.
    pub bank_accounts_created: usize,
}

/// Account repository for the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pure account nature rule: ASSET/EXPENSE debit, everything else credit.
    #[must_use]
    pub fn account_nature(account_type: ledger::AccountType) -> AccountNature {
        ledger::account_nature(account_type)
    }

    /// Creates a GL account.
    ///
    /// # Errors
    ///
    /// `DuplicateCode` if the code is taken.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<gl_accounts::Model, LedgerError> {
        let account = create_account_in(&self.db, input).await?;
        info!(account_id = %account.id, "GL account created");
        Ok(account)
    }

    /// Finds a GL account by code.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if no account has the code.
    pub async fn get_account_by_code(&self, code: &str) -> Result<gl_accounts::Model, LedgerError> {
        account_by_code_in(&self.db, code).await
    }

    /// Finds a GL account by ID.
    pub async fn find_account(
        &self,
        id: GlAccountId,
    ) -> Result<Option<gl_accounts::Model>, LedgerError> {
        gl_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists every GL account ordered by code.
    pub async fn list_accounts(&self) -> Result<Vec<gl_accounts::Model>, LedgerError> {
        gl_accounts::Entity::find()
            .order_by_asc(gl_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Deletes a GL account and everything that references it.
    ///
    /// Removes every journal entry with a line on the account (directly or
    /// through a mapped bank account), their lines and settlement lines,
    /// the mapped bank accounts, then the account. Administrative only.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn delete_account(&self, id: GlAccountId) -> Result<(), LedgerError> {
        let id = id.into_inner();
        let txn = self.db.begin().await.map_err(db_err)?;

        gl_accounts::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;

        let bank_ids: Vec<Uuid> = company_bank_accounts::Entity::find()
            .select_only()
            .column(company_bank_accounts::Column::Id)
            .filter(company_bank_accounts::Column::GlAccountId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        let mut condition = Condition::any().add(journal_lines::Column::GlAccountId.eq(id));
        if !bank_ids.is_empty() {
            condition =
                condition.add(journal_lines::Column::CompanyBankAccountId.is_in(bank_ids.clone()));
        }
        let entry_ids: Vec<Uuid> = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::EntryId)
            .filter(condition)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;
        let entry_ids: Vec<Uuid> = entry_ids
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        delete_entries_in(&txn, &entry_ids).await?;

        if !bank_ids.is_empty() {
            company_bank_accounts::Entity::delete_many()
                .filter(company_bank_accounts::Column::Id.is_in(bank_ids.clone()))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }
        gl_accounts::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        info!(
            entries_deleted = entry_ids.len(),
            bank_accounts_deleted = bank_ids.len(),
            "GL account deleted"
        );
        Ok(())
    }

    /// Creates a company bank account mapped onto an asset GL account.
    ///
    /// # Errors
    ///
    /// `DuplicateCode` if the code is taken, `AccountNotFound` if the GL
    /// account is missing, `InvalidBankAccount` if it is not an asset.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_bank_account(
        &self,
        input: CreateBankAccountInput,
    ) -> Result<company_bank_accounts::Model, LedgerError> {
        let bank = create_bank_account_in(&self.db, input).await?;
        info!(bank_account_id = %bank.id, "bank account created");
        Ok(bank)
    }

    /// Finds a company bank account by code.
    ///
    /// # Errors
    ///
    /// `BankAccountNotFound` if no bank account has the code.
    pub async fn get_bank_account_by_code(
        &self,
        code: &str,
    ) -> Result<company_bank_accounts::Model, LedgerError> {
        bank_account_by_code_in(&self.db, code).await
    }

    /// Finds a company bank account by ID.
    pub async fn find_bank_account(
        &self,
        id: BankAccountId,
    ) -> Result<Option<company_bank_accounts::Model>, LedgerError> {
        company_bank_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Creates the default chart and bank accounts, skipping existing codes.
    #[instrument(skip(self))]
    pub async fn seed_default_chart(&self) -> Result<SeedSummary, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut summary = SeedSummary::default();

        for (code, name, account_type) in DEFAULT_CHART {
            if find_account_by_code_in(&txn, code).await?.is_none() {
                create_account_in(
                    &txn,
                    CreateAccountInput {
                        code: (*code).to_string(),
                        name: (*name).to_string(),
                        account_type: *account_type,
                    },
                )
                .await?;
                summary.accounts_created += 1;
            }
        }

        for (code, name, gl_code) in DEFAULT_BANK_ACCOUNTS {
            if find_bank_account_by_code_in(&txn, code).await?.is_none() {
                let gl = account_by_code_in(&txn, gl_code).await?;
                create_bank_account_in(
                    &txn,
                    CreateBankAccountInput {
                        code: (*code).to_string(),
                        name: (*name).to_string(),
                        gl_account_id: GlAccountId::from_uuid(gl.id),
                    },
                )
                .await?;
                summary.bank_accounts_created += 1;
            }
        }

        txn.commit().await.map_err(db_err)?;
        info!(
            accounts_created = summary.accounts_created,
            bank_accounts_created = summary.bank_accounts_created,
            "default chart seeded"
        );
        Ok(summary)
    }
}

pub(crate) async fn create_account_in<C: ConnectionTrait>(
    db: &C,
    input: CreateAccountInput,
) -> Result<gl_accounts::Model, LedgerError> {
    if find_account_by_code_in(db, &input.code).await?.is_some() {
        return Err(LedgerError::DuplicateCode(input.code));
    }

    gl_accounts::ActiveModel {
        id: Set(GlAccountId::new().into_inner()),
        code: Set(input.code),
        name: Set(input.name),
        account_type: Set(AccountType::from(input.account_type)),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .map_err(db_err)
}

pub(crate) async fn create_bank_account_in<C: ConnectionTrait>(
    db: &C,
    input: CreateBankAccountInput,
) -> Result<company_bank_accounts::Model, LedgerError> {
    if find_bank_account_by_code_in(db, &input.code).await?.is_some() {
        return Err(LedgerError::DuplicateCode(input.code));
    }

    let gl_id = input.gl_account_id.into_inner();
    let gl = gl_accounts::Entity::find_by_id(gl_id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::AccountNotFound(gl_id.to_string()))?;
    if gl.account_type != AccountType::Asset {
        return Err(LedgerError::InvalidBankAccount(format!(
            "GL account {} is not an asset account",
            gl.code
        )));
    }

    company_bank_accounts::ActiveModel {
        id: Set(BankAccountId::new().into_inner()),
        code: Set(input.code),
        name: Set(input.name),
        gl_account_id: Set(gl.id),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .map_err(db_err)
}

async fn find_account_by_code_in<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<gl_accounts::Model>, LedgerError> {
    gl_accounts::Entity::find()
        .filter(gl_accounts::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(db_err)
}

async fn find_bank_account_by_code_in<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<company_bank_accounts::Model>, LedgerError> {
    company_bank_accounts::Entity::find()
        .filter(company_bank_accounts::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(db_err)
}

pub(crate) async fn account_by_code_in<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<gl_accounts::Model, LedgerError> {
    find_account_by_code_in(db, code)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
}

pub(crate) async fn bank_account_by_code_in<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<company_bank_accounts::Model, LedgerError> {
    find_bank_account_by_code_in(db, code)
        .await?
        .ok_or_else(|| LedgerError::BankAccountNotFound(code.to_string()))
}
