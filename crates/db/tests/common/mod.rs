//! Shared fixtures: an in-memory SQLite database with the real migrations
//! and the default chart of accounts.

#![allow(dead_code)]

use chrono::NaiveDate;
use rentledger_core::ledger::{AccountRef, CreateJournalEntryInput, JournalLineInput};
use rentledger_db::entities::rent_agreements;
use rentledger_db::migration::{Migrator, MigratorTrait};
use rentledger_db::repositories::JournalEntryWithLines;
use rentledger_db::{
    AccountRepository, DepositRepository, JournalRepository, LedgerRepository, ReportRepository,
    SettlementRepository,
};
use rentledger_shared::{DatabaseConfig, LedgerConfig};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

/// Repositories sharing one seeded database.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub accounts: AccountRepository,
    pub journal: JournalRepository,
    pub settlements: SettlementRepository,
    pub ledger: LedgerRepository,
    pub reports: ReportRepository,
    pub deposits: DepositRepository,
}

impl TestContext {
    /// GL account id by code.
    pub async fn gl(&self, code: &str) -> Uuid {
        self.accounts
            .get_account_by_code(code)
            .await
            .expect("account should exist")
            .id
    }

    /// Bank account id by code.
    pub async fn bank(&self, code: &str) -> Uuid {
        self.accounts
            .get_bank_account_by_code(code)
            .await
            .expect("bank account should exist")
            .id
    }

    /// Posts `DEBIT debit_code / CREDIT credit_code` for `amount`.
    pub async fn post(
        &self,
        date: NaiveDate,
        description: &str,
        debit_code: &str,
        credit_code: &str,
        amount: Decimal,
    ) -> JournalEntryWithLines {
        let debit = self.gl(debit_code).await;
        let credit = self.gl(credit_code).await;
        self.journal
            .create_journal_entry(CreateJournalEntryInput::new(
                description,
                date,
                vec![
                    JournalLineInput::debit(AccountRef::GlAccount(debit), amount),
                    JournalLineInput::credit(AccountRef::GlAccount(credit), amount),
                ],
            ))
            .await
            .expect("entry should post")
    }

    /// Inserts a rent agreement with fresh renter, unit and property ids.
    pub async fn rent_agreement(&self) -> rent_agreements::Model {
        rent_agreements::ActiveModel {
            id: Set(Uuid::now_v7()),
            renter_id: Set(Uuid::now_v7()),
            unit_id: Set(Uuid::now_v7()),
            property_id: Set(Uuid::now_v7()),
        }
        .insert(&self.db)
        .await
        .expect("rent agreement should insert")
    }
}

/// Migrated, seeded in-memory database.
pub async fn setup() -> TestContext {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = rentledger_db::connect_with(&config)
        .await
        .expect("sqlite should connect");
    Migrator::up(&db, None).await.expect("migrations should run");

    let accounts = AccountRepository::new(db.clone());
    accounts
        .seed_default_chart()
        .await
        .expect("chart should seed");

    TestContext {
        journal: JournalRepository::new(db.clone()),
        settlements: SettlementRepository::new(db.clone()),
        ledger: LedgerRepository::new(db.clone()),
        reports: ReportRepository::new(db.clone()),
        deposits: DepositRepository::new(db.clone(), LedgerConfig::default()),
        accounts,
        db,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
