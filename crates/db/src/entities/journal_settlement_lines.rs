//! `SeaORM` Entity for journal_settlement_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntrySide;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_settlement_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub line_id: Uuid,
    pub side: EntrySide,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount_matched: Decimal,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_settlements::Entity",
        from = "Column::SettlementId",
        to = "super::journal_settlements::Column::Id"
    )]
    JournalSettlements,
    #[sea_orm(
        belongs_to = "super::journal_lines::Entity",
        from = "Column::LineId",
        to = "super::journal_lines::Column::Id"
    )]
    JournalLines,
}

impl Related<super::journal_settlements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalSettlements.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
