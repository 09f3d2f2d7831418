//! Trial balance aggregation.

use std::collections::HashMap;

use chrono::NaiveDate;
use rentledger_shared::types::GlAccountId;
use rust_decimal::Decimal;

use super::types::{TrialBalanceLine, TrialBalanceReport, Trend};
use crate::ledger::{AccountNature, AccountType, EntrySide};

/// Chart-of-accounts entry as needed by the trial balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Account ID.
    pub id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

/// A posted line reduced to what the trial balance sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Effective GL account; `None` for counterparty lines.
    pub account_id: Option<GlAccountId>,
    /// Line side.
    pub side: EntrySide,
    /// Line amount.
    pub amount: Decimal,
}

#[derive(Default)]
struct Sums {
    debit: Decimal,
    credit: Decimal,
}

impl Sums {
    fn add(&mut self, side: EntrySide, amount: Decimal) {
        match side {
            EntrySide::Debit => self.debit += amount,
            EntrySide::Credit => self.credit += amount,
        }
    }
}

/// Stateless trial balance aggregator.
pub struct TrialBalanceService;

impl TrialBalanceService {
    /// Aggregates postings per account.
    ///
    /// Postings whose account is missing from `accounts`, or that have no
    /// account at all, land in the unallocated bucket. Totals cover every
    /// posting, so a set of balanced entries always yields a balanced report.
    #[must_use]
    pub fn aggregate<I>(
        mut accounts: Vec<AccountInfo>,
        postings: I,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> TrialBalanceReport
    where
        I: IntoIterator<Item = Posting>,
    {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut per_account: HashMap<GlAccountId, Sums> =
            accounts.iter().map(|a| (a.id, Sums::default())).collect();
        let mut unallocated = Sums::default();
        let mut totals = Sums::default();

        for posting in postings {
            totals.add(posting.side, posting.amount);
            match posting.account_id.and_then(|id| per_account.get_mut(&id)) {
                Some(sums) => sums.add(posting.side, posting.amount),
                None => unallocated.add(posting.side, posting.amount),
            }
        }

        let lines = accounts
            .into_iter()
            .map(|account| {
                let sums = per_account.remove(&account.id).unwrap_or_default();
                let nature = AccountNature::from(account.account_type);
                let raw_balance = sums.debit - sums.credit;
                TrialBalanceLine {
                    account_id: account.id,
                    code: account.code,
                    name: account.name,
                    account_type: account.account_type,
                    nature,
                    total_debit: sums.debit,
                    total_credit: sums.credit,
                    raw_balance,
                    natural_balance: nature.natural_balance(raw_balance),
                    trend: Trend::from_balance(raw_balance),
                }
            })
            .collect();

        let total_balance = totals.debit - totals.credit;
        TrialBalanceReport {
            start_date,
            end_date,
            accounts: lines,
            unallocated_debit: unallocated.debit,
            unallocated_credit: unallocated.credit,
            total_debits: totals.debit,
            total_credits: totals.credit,
            total_balance,
            trend: Trend::from_balance(total_balance),
            is_balanced: total_balance == Decimal::ZERO,
        }
    }
}
