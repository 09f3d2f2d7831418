//! `SeaORM` Entity for journal_settlements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub note: Option<String>,
    /// Set when the settlement is released; released settlements no longer count.
    pub reversed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_settlement_lines::Entity")]
    JournalSettlementLines,
}

impl Related<super::journal_settlement_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalSettlementLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
