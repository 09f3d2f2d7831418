//! `SeaORM` Entity for security_deposits table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DepositStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "security_deposits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub deducted_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub refunded_amount: Decimal,
    pub deduction_reason: Option<String>,
    pub status: DepositStatus,
    pub renter_id: Uuid,
    pub unit_id: Uuid,
    pub property_id: Uuid,
    pub rent_agreement_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub intake_entry_id: Option<Uuid>,
    /// The liability credit line posted at intake.
    pub liability_line_id: Option<Uuid>,
    pub received_at: Date,
    pub refunded_at: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rent_agreements::Entity",
        from = "Column::RentAgreementId",
        to = "super::rent_agreements::Column::Id"
    )]
    RentAgreements,
}

impl Related<super::rent_agreements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentAgreements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
