//! Rent agreements, payments and security deposits.
//!
//! Rent agreements and payments belong to the leasing side; only the
//! columns the deposit workflow reads or writes are created here.

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
                    .table(RentAgreements::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RentAgreements::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RentAgreements::RenterId).uuid().not_null())
                    .col(ColumnDef::new(RentAgreements::UnitId).uuid().not_null())
                    .col(ColumnDef::new(RentAgreements::PropertyId).uuid().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::RentAgreementId).uuid().not_null())
                    .col(money_column(manager, Payments::Amount).not_null())
                    .col(ColumnDef::new(Payments::PaymentType).text().not_null())
                    .col(ColumnDef::new(Payments::Status).text().not_null())
                    .col(ColumnDef::new(Payments::PaidAt).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_rent_agreement")
                            .from(Payments::Table, Payments::RentAgreementId)
                            .to(RentAgreements::Table, RentAgreements::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SecurityDeposits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityDeposits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(money_column(manager, SecurityDeposits::Amount).not_null())
                    .col(
                        money_column(manager, SecurityDeposits::DeductedAmount)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        money_column(manager, SecurityDeposits::RefundedAmount)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SecurityDeposits::DeductionReason).text().null())
                    .col(ColumnDef::new(SecurityDeposits::Status).text().not_null())
                    .col(ColumnDef::new(SecurityDeposits::RenterId).uuid().not_null())
                    .col(ColumnDef::new(SecurityDeposits::UnitId).uuid().not_null())
                    .col(ColumnDef::new(SecurityDeposits::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(SecurityDeposits::RentAgreementId).uuid().not_null())
                    .col(ColumnDef::new(SecurityDeposits::PaymentId).uuid().null())
                    .col(ColumnDef::new(SecurityDeposits::IntakeEntryId).uuid().null())
                    .col(ColumnDef::new(SecurityDeposits::LiabilityLineId).uuid().null())
                    .col(ColumnDef::new(SecurityDeposits::ReceivedAt).date().not_null())
                    .col(ColumnDef::new(SecurityDeposits::RefundedAt).date().null())
                    .col(
                        ColumnDef::new(SecurityDeposits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SecurityDeposits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_security_deposits_rent_agreement")
                            .from(SecurityDeposits::Table, SecurityDeposits::RentAgreementId)
                            .to(RentAgreements::Table, RentAgreements::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_security_deposits_agreement")
                    .table(SecurityDeposits::Table)
                    .col(SecurityDeposits::RentAgreementId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SecurityDeposits::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RentAgreements::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum RentAgreements {
    Table,
    Id,
    RenterId,
    UnitId,
    PropertyId,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    RentAgreementId,
    Amount,
    PaymentType,
    Status,
    PaidAt,
}

#[derive(DeriveIden)]
enum SecurityDeposits {
    Table,
    Id,
    Amount,
    DeductedAmount,
    RefundedAmount,
    DeductionReason,
    Status,
    RenterId,
    UnitId,
    PropertyId,
    RentAgreementId,
    PaymentId,
    IntakeEntryId,
    LiabilityLineId,
    ReceivedAt,
    RefundedAt,
    CreatedAt,
    UpdatedAt,
}
