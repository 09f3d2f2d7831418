//! `SeaORM` entity definitions.

pub mod prelude;

pub mod company_bank_accounts;
pub mod gl_accounts;
pub mod journal_entries;
pub mod journal_lines;
pub mod journal_settlement_lines;
pub mod journal_settlements;
pub mod payments;
pub mod rent_agreements;
pub mod sea_orm_active_enums;
pub mod security_deposits;
