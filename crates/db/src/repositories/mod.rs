//! Repository abstractions for data access.
//!
//! Each repository owns an injected `DatabaseConnection`. Operations that
//! write run in one transaction; the `*_in` helpers are generic over
//! `ConnectionTrait` so workflows can compose them inside the caller's
//! transaction.

pub mod account;
pub mod deposit;
pub mod journal;
pub mod ledger;
pub mod report;
pub mod settlement;

pub use account::{
    AccountRepository, CreateAccountInput, CreateBankAccountInput, DEFAULT_BANK_ACCOUNTS,
    DEFAULT_CHART, SeedSummary,
};
pub use deposit::DepositRepository;
pub use journal::{JournalEntryWithLines, JournalRepository};
pub use ledger::LedgerRepository;
pub use report::ReportRepository;
pub use settlement::{SettlementRepository, SettlementWithLines};

use rentledger_core::ledger::LedgerError;
use sea_orm::DbErr;

/// Maps a `SeaORM` error into the ledger error type.
pub(crate) fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Current time as stored in timestamp columns.
pub(crate) fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}
