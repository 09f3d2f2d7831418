//! Ledger and trial balance reports.
//!
//! Pure report building; the db crate loads the rows and hands them over.
//! - Period anchoring and opening balance carry-over
//! - Ledger rows with running balances
//! - Trial balance per account

pub mod ledger;
pub mod period;
pub mod trial_balance;
pub mod types;


pub use ledger::{LedgerBuilder, LedgerEntryView, LedgerLineView};
pub use period::LedgerPeriod;
pub use trial_balance::{AccountInfo, Posting, TrialBalanceService};
pub use types::*;
