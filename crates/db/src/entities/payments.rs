//! `SeaORM` Entity for payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentStatus, PaymentType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub rent_agreement_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub paid_at: Option<Date>,
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
