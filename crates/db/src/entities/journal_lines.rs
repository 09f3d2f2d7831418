//! `SeaORM` Entity for journal_lines table.

use rentledger_core::ledger::AccountRef;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntrySide, PartyType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_id: Uuid,
    pub side: EntrySide,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub gl_account_id: Option<Uuid>,
    pub company_bank_account_id: Option<Uuid>,
    pub counterparty_label: Option<String>,
    pub party_type: Option<PartyType>,
    pub party_client_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub maintenance_id: Option<Uuid>,
    pub rent_agreement_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub security_deposit_id: Option<Uuid>,
    pub memo: Option<String>,
    pub is_settled: bool,
    pub settled_at: Option<DateTimeWithTimeZone>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::EntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
    #[sea_orm(
        belongs_to = "super::gl_accounts::Entity",
        from = "Column::GlAccountId",
        to = "super::gl_accounts::Column::Id"
    )]
    GlAccounts,
    #[sea_orm(
        belongs_to = "super::company_bank_accounts::Entity",
        from = "Column::CompanyBankAccountId",
        to = "super::company_bank_accounts::Column::Id"
    )]
    CompanyBankAccounts,
    #[sea_orm(has_many = "super::journal_settlement_lines::Entity")]
    JournalSettlementLines,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::gl_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlAccounts.def()
    }
}

impl Related<super::company_bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyBankAccounts.def()
    }
}

impl Related<super::journal_settlement_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalSettlementLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The posting target of this line.
    ///
    /// `None` only for rows written outside the repositories.
    #[must_use]
    pub fn account_ref(&self) -> Option<AccountRef> {
        if let Some(id) = self.gl_account_id {
            Some(AccountRef::GlAccount(id))
        } else if let Some(id) = self.company_bank_account_id {
            Some(AccountRef::BankAccount(id))
        } else {
            self.counterparty_label.clone().map(AccountRef::Counterparty)
        }
    }
}
