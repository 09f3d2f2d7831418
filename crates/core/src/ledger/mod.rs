//! Double-entry bookkeeping logic.
//!
//! - Domain types for journal-entry creation
//! - Account nature and running balances
//! - Entry validation
//! - Settlement bounds
//! - Reversing entries
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod reversal;
pub mod service;
pub mod settlement;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{AccountNature, RunningBalance};
pub use error::LedgerError;
pub use reversal::{ReversalInput, ReversalService};
pub use service::LedgerService;
pub use settlement::{
    LineMatchState, PaymentStatus, SettleLinesInput, SettlementMatch, SettlementService,
};
pub use types::{
    AccountRef, AccountType, CreateJournalEntryInput, EntryKind, EntrySide, EntryTotals,
    JournalLineInput, LineLinks, PartyType,
};

/// Nature of an account type: ASSET/EXPENSE debit, everything else credit.
#[must_use]
pub fn account_nature(account_type: AccountType) -> AccountNature {
    AccountNature::from(account_type)
}
