//! Report data types.

use chrono::NaiveDate;
use rentledger_shared::types::{GlAccountId, JournalEntryId, JournalLineId, PageMeta, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{AccountNature, AccountType, EntrySide};

/// Which lines a ledger follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LedgerMode {
    /// Lines whose effective GL account is `gl_account_id`.
    Accounts {
        /// The subject account.
        gl_account_id: GlAccountId,
    },
    /// Lines attributed to an owner, optionally for one property.
    Owner {
        /// The owner.
        owner_id: Uuid,
        /// Restrict to one property.
        property_id: Option<Uuid>,
    },
}

/// Input for `getLedger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerQuery {
    /// Subject filter.
    pub mode: LedgerMode,
    /// Period start; no start means an empty ledger.
    pub start_date: Option<NaiveDate>,
    /// Period end (inclusive); open-ended when absent.
    pub end_date: Option<NaiveDate>,
    /// Optional page of rows.
    pub page: Option<PageRequest>,
}

/// One ledger row per subject line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Entry the line belongs to.
    pub entry_id: JournalEntryId,
    /// The subject line.
    pub line_id: JournalLineId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Side shown to the reader: the counterpart side.
    pub display_side: EntrySide,
    /// Labels of the counterpart lines.
    pub counterparts: Vec<String>,
    /// Subject line amount.
    pub amount: Decimal,
    /// Amount signed by the subject account's nature.
    pub signed_change: Decimal,
    /// Running balance after this row.
    pub current_balance: Decimal,
}

/// Result of `getLedger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Rows (the requested page, or all rows).
    pub rows: Vec<LedgerRow>,
    /// Balance carried in from before the period.
    pub opening_balance: Decimal,
    /// Sum of amounts displayed as debits.
    pub total_debits: Decimal,
    /// Sum of amounts displayed as credits.
    pub total_credits: Decimal,
    /// Closing running balance.
    pub total_balance: Decimal,
    /// Number of rows in the whole period.
    pub total_rows: u64,
    /// Page metadata when a page was requested.
    pub page: Option<PageMeta>,
}

impl LedgerReport {
    /// Ledger with no rows and zeroed totals.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            opening_balance: Decimal::ZERO,
            total_debits: Decimal::ZERO,
            total_credits: Decimal::ZERO,
            total_balance: Decimal::ZERO,
            total_rows: 0,
            page: None,
        }
    }
}

/// Direction of a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Positive balance.
    Up,
    /// Negative balance.
    Down,
    /// Zero.
    Flat,
}

impl Trend {
    /// Trend from the sign of a balance.
    #[must_use]
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            Self::Up
        } else if balance < Decimal::ZERO {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Input for `getTrialBalance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceQuery {
    /// Inclusive start, unbounded when absent.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end, unbounded when absent.
    pub end_date: Option<NaiveDate>,
}

/// Per-account trial balance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account ID.
    pub account_id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account nature.
    pub nature: AccountNature,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Debits minus credits.
    pub raw_balance: Decimal,
    /// Balance signed by nature.
    pub natural_balance: Decimal,
    /// Sign of `raw_balance`.
    pub trend: Trend,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Period start.
    pub start_date: Option<NaiveDate>,
    /// Period end.
    pub end_date: Option<NaiveDate>,
    /// Accounts ordered by code.
    pub accounts: Vec<TrialBalanceLine>,
    /// Debits of lines without a GL account.
    pub unallocated_debit: Decimal,
    /// Credits of lines without a GL account.
    pub unallocated_credit: Decimal,
    /// All debits of the period.
    pub total_debits: Decimal,
    /// All credits of the period.
    pub total_credits: Decimal,
    /// `total_debits - total_credits`.
    pub total_balance: Decimal,
    /// Sign of `total_balance`.
    pub trend: Trend,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}
