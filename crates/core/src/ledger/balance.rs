//! Account nature and running balance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AccountType, EntrySide};

/// Normal increase direction of an account.
///
/// - Asset/Expense: balance += debit - credit
/// - Liability/Equity/Revenue: balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountNature {
    /// Debit-natured (Asset, Expense).
    Debit,
    /// Credit-natured (Liability, Equity, Revenue).
    Credit,
}

impl AccountNature {
    /// Determines the nature from a stored account type string.
    ///
    /// Unknown strings fall back to debit.
    #[must_use]
    pub fn from_account_type(account_type: &str) -> Self {
        match account_type.to_lowercase().as_str() {
            "liability" | "equity" | "revenue" => Self::Credit,
            _ => Self::Debit,
        }
    }

    /// The side that increases an account of this nature.
    #[must_use]
    pub const fn increasing_side(self) -> EntrySide {
        match self {
            Self::Debit => EntrySide::Debit,
            Self::Credit => EntrySide::Credit,
        }
    }

    /// Signed change of a single line: +amount on the increasing side.
    #[must_use]
    pub fn signed_change(self, side: EntrySide, amount: Decimal) -> Decimal {
        if side == self.increasing_side() {
            amount
        } else {
            -amount
        }
    }

    /// Converts a raw `debits - credits` balance into the natural sign.
    #[must_use]
    pub fn natural_balance(self, raw_balance: Decimal) -> Decimal {
        match self {
            Self::Debit => raw_balance,
            Self::Credit => -raw_balance,
        }
    }
}

impl From<AccountType> for AccountNature {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Asset | AccountType::Expense => Self::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => Self::Credit,
        }
    }
}

/// Running balance across consecutive ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before this row.
    pub previous_balance: Decimal,
    /// Balance after this row.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// The balance carried in before the first row.
    #[must_use]
    pub fn opening(balance: Decimal) -> Self {
        Self {
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// The balance after applying `change` on top of `self`.
    ///
    /// - `current_balance[N] = previous_balance[N] + change`
    /// - `previous_balance[N] = current_balance[N-1]`
    #[must_use]
    pub fn next(&self, change: Decimal) -> Self {
        Self {
            previous_balance: self.current_balance,
            current_balance: self.current_balance + change,
        }
    }
}
