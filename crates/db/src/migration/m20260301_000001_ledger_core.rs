//! Chart of accounts, journal and settlement tables.

use sea_orm_migration::prelude::*;

use super::money_column;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GlAccounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GlAccounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GlAccounts::Code).string_len(32).not_null().unique_key())
                    .col(ColumnDef::new(GlAccounts::Name).string().not_null())
                    .col(ColumnDef::new(GlAccounts::AccountType).text().not_null())
                    .col(
                        ColumnDef::new(GlAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompanyBankAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyBankAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyBankAccounts::Code)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CompanyBankAccounts::Name).string().not_null())
                    .col(ColumnDef::new(CompanyBankAccounts::GlAccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(CompanyBankAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_bank_accounts_gl_account")
                            .from(CompanyBankAccounts::Table, CompanyBankAccounts::GlAccountId)
                            .to(GlAccounts::Table, GlAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::Kind).text().not_null())
                    .col(ColumnDef::new(JournalEntries::ReversesEntryId).uuid().null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::EntryDate)
                    .col(JournalEntries::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_reverses")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::ReversesEntryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalLines::EntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::Side).text().not_null())
                    .col(money_column(manager, JournalLines::Amount).not_null())
                    .col(ColumnDef::new(JournalLines::GlAccountId).uuid().null())
                    .col(ColumnDef::new(JournalLines::CompanyBankAccountId).uuid().null())
                    .col(ColumnDef::new(JournalLines::CounterpartyLabel).string().null())
                    .col(ColumnDef::new(JournalLines::PartyType).text().null())
                    .col(ColumnDef::new(JournalLines::PartyClientId).uuid().null())
                    .col(ColumnDef::new(JournalLines::PropertyId).uuid().null())
                    .col(ColumnDef::new(JournalLines::UnitId).uuid().null())
                    .col(ColumnDef::new(JournalLines::MaintenanceId).uuid().null())
                    .col(ColumnDef::new(JournalLines::RentAgreementId).uuid().null())
                    .col(ColumnDef::new(JournalLines::PaymentId).uuid().null())
                    .col(ColumnDef::new(JournalLines::SecurityDepositId).uuid().null())
                    .col(ColumnDef::new(JournalLines::Memo).text().null())
                    .col(
                        ColumnDef::new(JournalLines::IsSettled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(JournalLines::SettledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(JournalLines::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JournalLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_entry")
                            .from(JournalLines::Table, JournalLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_gl_account")
                            .from(JournalLines::Table, JournalLines::GlAccountId)
                            .to(GlAccounts::Table, GlAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_bank_account")
                            .from(JournalLines::Table, JournalLines::CompanyBankAccountId)
                            .to(CompanyBankAccounts::Table, CompanyBankAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_journal_lines_entry", JournalLines::EntryId),
            ("idx_journal_lines_gl_account", JournalLines::GlAccountId),
            ("idx_journal_lines_bank_account", JournalLines::CompanyBankAccountId),
            ("idx_journal_lines_party", JournalLines::PartyClientId),
            ("idx_journal_lines_payment", JournalLines::PaymentId),
            ("idx_journal_lines_deposit", JournalLines::SecurityDepositId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(JournalLines::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(JournalSettlements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalSettlements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalSettlements::Note).text().null())
                    .col(
                        ColumnDef::new(JournalSettlements::ReversedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(JournalSettlements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalSettlementLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalSettlementLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalSettlementLines::SettlementId).uuid().not_null())
                    .col(ColumnDef::new(JournalSettlementLines::LineId).uuid().not_null())
                    .col(ColumnDef::new(JournalSettlementLines::Side).text().not_null())
                    .col(
                        money_column(manager, JournalSettlementLines::AmountMatched)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalSettlementLines::Note).text().null())
                    .col(
                        ColumnDef::new(JournalSettlementLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_settlement_lines_settlement")
                            .from(JournalSettlementLines::Table, JournalSettlementLines::SettlementId)
                            .to(JournalSettlements::Table, JournalSettlements::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_settlement_lines_line")
                            .from(JournalSettlementLines::Table, JournalSettlementLines::LineId)
                            .to(JournalLines::Table, JournalLines::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_settlement_lines_line")
                    .table(JournalSettlementLines::Table)
                    .col(JournalSettlementLines::LineId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalSettlementLines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalSettlements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalLines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyBankAccounts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GlAccounts::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum GlAccounts {
    Table,
    Id,
    Code,
    Name,
    AccountType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CompanyBankAccounts {
    Table,
    Id,
    Code,
    Name,
    GlAccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    Description,
    EntryDate,
    Kind,
    ReversesEntryId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    EntryId,
    Side,
    Amount,
    GlAccountId,
    CompanyBankAccountId,
    CounterpartyLabel,
    PartyType,
    PartyClientId,
    PropertyId,
    UnitId,
    MaintenanceId,
    RentAgreementId,
    PaymentId,
    SecurityDepositId,
    Memo,
    IsSettled,
    SettledAt,
    Version,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalSettlements {
    Table,
    Id,
    Note,
    ReversedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalSettlementLines {
    Table,
    Id,
    SettlementId,
    LineId,
    Side,
    AmountMatched,
    Note,
    CreatedAt,
}
