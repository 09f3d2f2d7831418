//! `SeaORM` active enums.
//!
//! Stored as text so the same schema runs on PostgreSQL and SQLite. Each enum
//! that has a domain twin in `rentledger-core` converts both ways.

use rentledger_core::{deposit, ledger as domain};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AccountType {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "REVENUE")]
    Revenue,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

impl From<domain::AccountType> for AccountType {
    fn from(value: domain::AccountType) -> Self {
        match value {
            domain::AccountType::Asset => Self::Asset,
            domain::AccountType::Liability => Self::Liability,
            domain::AccountType::Equity => Self::Equity,
            domain::AccountType::Revenue => Self::Revenue,
            domain::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for domain::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

/// Journal line side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EntrySide {
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

impl From<domain::EntrySide> for EntrySide {
    fn from(value: domain::EntrySide) -> Self {
        match value {
            domain::EntrySide::Debit => Self::Debit,
            domain::EntrySide::Credit => Self::Credit,
        }
    }
}

impl From<EntrySide> for domain::EntrySide {
    fn from(value: EntrySide) -> Self {
        match value {
            EntrySide::Debit => Self::Debit,
            EntrySide::Credit => Self::Credit,
        }
    }
}

/// Party a line is attributed to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PartyType {
    #[sea_orm(string_value = "OWNER")]
    Owner,
    #[sea_orm(string_value = "RENTER")]
    Renter,
}

impl From<domain::PartyType> for PartyType {
    fn from(value: domain::PartyType) -> Self {
        match value {
            domain::PartyType::Owner => Self::Owner,
            domain::PartyType::Renter => Self::Renter,
        }
    }
}

impl From<PartyType> for domain::PartyType {
    fn from(value: PartyType) -> Self {
        match value {
            PartyType::Owner => Self::Owner,
            PartyType::Renter => Self::Renter,
        }
    }
}

/// Journal entry classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EntryKind {
    #[sea_orm(string_value = "GENERAL")]
    General,
    #[sea_orm(string_value = "DEPOSIT_INTAKE")]
    DepositIntake,
    #[sea_orm(string_value = "DEPOSIT_REFUND")]
    DepositRefund,
    #[sea_orm(string_value = "DEPOSIT_DEDUCTION")]
    DepositDeduction,
    #[sea_orm(string_value = "DEPOSIT_TRANSFER")]
    DepositTransfer,
    #[sea_orm(string_value = "REVERSAL")]
    Reversal,
}

impl From<domain::EntryKind> for EntryKind {
    fn from(value: domain::EntryKind) -> Self {
        match value {
            domain::EntryKind::General => Self::General,
            domain::EntryKind::DepositIntake => Self::DepositIntake,
            domain::EntryKind::DepositRefund => Self::DepositRefund,
            domain::EntryKind::DepositDeduction => Self::DepositDeduction,
            domain::EntryKind::DepositTransfer => Self::DepositTransfer,
            domain::EntryKind::Reversal => Self::Reversal,
        }
    }
}

impl From<EntryKind> for domain::EntryKind {
    fn from(value: EntryKind) -> Self {
        match value {
            EntryKind::General => Self::General,
            EntryKind::DepositIntake => Self::DepositIntake,
            EntryKind::DepositRefund => Self::DepositRefund,
            EntryKind::DepositDeduction => Self::DepositDeduction,
            EntryKind::DepositTransfer => Self::DepositTransfer,
            EntryKind::Reversal => Self::Reversal,
        }
    }
}

/// Security deposit status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DepositStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "PARTIALLY_REFUNDED")]
    PartiallyRefunded,
    #[sea_orm(string_value = "REFUNDED")]
    Refunded,
    #[sea_orm(string_value = "FORFEITED")]
    Forfeited,
}

impl From<deposit::DepositStatus> for DepositStatus {
    fn from(value: deposit::DepositStatus) -> Self {
        match value {
            deposit::DepositStatus::Active => Self::Active,
            deposit::DepositStatus::PartiallyRefunded => Self::PartiallyRefunded,
            deposit::DepositStatus::Refunded => Self::Refunded,
            deposit::DepositStatus::Forfeited => Self::Forfeited,
        }
    }
}

impl From<DepositStatus> for deposit::DepositStatus {
    fn from(value: DepositStatus) -> Self {
        match value {
            DepositStatus::Active => Self::Active,
            DepositStatus::PartiallyRefunded => Self::PartiallyRefunded,
            DepositStatus::Refunded => Self::Refunded,
            DepositStatus::Forfeited => Self::Forfeited,
        }
    }
}

/// Payment classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentType {
    #[sea_orm(string_value = "RENT")]
    Rent,
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
    #[sea_orm(string_value = "INSURANCE")]
    Insurance,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// Payment status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
}
