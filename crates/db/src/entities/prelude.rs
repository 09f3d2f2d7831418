//! Entity re-exports.

pub use super::company_bank_accounts::Entity as CompanyBankAccounts;
pub use super::gl_accounts::Entity as GlAccounts;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_lines::Entity as JournalLines;
pub use super::journal_settlement_lines::Entity as JournalSettlementLines;
pub use super::journal_settlements::Entity as JournalSettlements;
pub use super::payments::Entity as Payments;
pub use super::rent_agreements::Entity as RentAgreements;
pub use super::security_deposits::Entity as SecurityDeposits;
