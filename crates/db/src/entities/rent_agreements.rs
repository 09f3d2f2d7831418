//! `SeaORM` Entity for rent_agreements table.
//!
//! Owned by the leasing side of the product; the ledger only reads it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rent_agreements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub renter_id: Uuid,
    pub unit_id: Uuid,
    pub property_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::security_deposits::Entity")]
    SecurityDeposits,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::security_deposits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SecurityDeposits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
