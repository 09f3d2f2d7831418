//! Ledger domain types for journal-entry creation and validation.
//!
//! These types describe a journal entry before it is persisted: the chart of
//! accounts classification, the side of each line, the account a line posts
//! to and the optional business links a line carries.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GL account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Asset account (debit-natured).
    Asset,
    /// Liability account (credit-natured).
    Liability,
    /// Equity account (credit-natured).
    Equity,
    /// Revenue account (credit-natured).
    Revenue,
    /// Expense account (debit-natured).
    Expense,
}

impl AccountType {
    /// Stable string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySide {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl EntrySide {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Stable string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for EntrySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Party a line is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyType {
    /// Property owner.
    Owner,
    /// Tenant.
    Renter,
}

/// Journal entry classification.
///
/// The deposit workflow uses the kind to find the adjustment entries it
/// posted earlier for a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Ordinary journal entry.
    General,
    /// Deposit received from a tenant.
    DepositIntake,
    /// Deposit paid back to a tenant.
    DepositRefund,
    /// Deposit kept as revenue.
    DepositDeduction,
    /// Kept deposit cash moved to the operating bank.
    DepositTransfer,
    /// Reversal of another entry.
    Reversal,
}

impl EntryKind {
    /// Returns true for the entries `refundDeposit` posts and later reverses.
    #[must_use]
    pub const fn is_deposit_adjustment(self) -> bool {
        matches!(
            self,
            Self::DepositRefund | Self::DepositDeduction | Self::DepositTransfer
        )
    }
}

/// What a journal line posts to. Exactly one target per line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum AccountRef {
    /// A GL account.
    GlAccount(Uuid),
    /// A company bank account (resolves to its GL account).
    BankAccount(Uuid),
    /// Free-text counterparty with no GL account behind it.
    Counterparty(String),
}

/// Optional business links carried by a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineLinks {
    /// Property the line relates to.
    pub property_id: Option<Uuid>,
    /// Unit the line relates to.
    pub unit_id: Option<Uuid>,
    /// Maintenance job the line relates to.
    pub maintenance_id: Option<Uuid>,
    /// Rent agreement the line relates to.
    pub rent_agreement_id: Option<Uuid>,
    /// Payment the line relates to.
    pub payment_id: Option<Uuid>,
    /// Security deposit the line relates to.
    pub security_deposit_id: Option<Uuid>,
}

/// Input for a single journal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineInput {
    /// Debit or credit.
    pub side: EntrySide,
    /// Positive amount.
    pub amount: Decimal,
    /// Posting target.
    pub account: AccountRef,
    /// Party attribution.
    pub party_type: Option<PartyType>,
    /// Owner or renter id for `party_type`.
    pub party_client_id: Option<Uuid>,
    /// Business links.
    pub links: LineLinks,
    /// Optional memo.
    pub memo: Option<String>,
}

impl JournalLineInput {
    /// A debit line with no party and no links.
    #[must_use]
    pub fn debit(account: AccountRef, amount: Decimal) -> Self {
        Self::new(EntrySide::Debit, account, amount)
    }

    /// A credit line with no party and no links.
    #[must_use]
    pub fn credit(account: AccountRef, amount: Decimal) -> Self {
        Self::new(EntrySide::Credit, account, amount)
    }

    fn new(side: EntrySide, account: AccountRef, amount: Decimal) -> Self {
        Self {
            side,
            amount,
            account,
            party_type: None,
            party_client_id: None,
            links: LineLinks::default(),
            memo: None,
        }
    }

    /// Attributes the line to a party.
    #[must_use]
    pub fn with_party(mut self, party_type: PartyType, client_id: Uuid) -> Self {
        self.party_type = Some(party_type);
        self.party_client_id = Some(client_id);
        self
    }

    /// Sets the business links.
    #[must_use]
    pub fn with_links(mut self, links: LineLinks) -> Self {
        self.links = links;
        self
    }

    /// Sets the memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalEntryInput {
    /// Entry description.
    pub description: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry classification.
    pub kind: EntryKind,
    /// Entry this one reverses, for `EntryKind::Reversal`.
    pub reverses_entry_id: Option<Uuid>,
    /// The lines (at least 2).
    pub lines: Vec<JournalLineInput>,
}

impl CreateJournalEntryInput {
    /// A general entry.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        entry_date: NaiveDate,
        lines: Vec<JournalLineInput>,
    ) -> Self {
        Self {
            description: description.into(),
            entry_date,
            kind: EntryKind::General,
            reverses_entry_id: None,
            lines,
        }
    }

    /// Sets the entry kind.
    #[must_use]
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Entry totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryTotals {
    /// Sum of debit lines.
    pub debit: Decimal,
    /// Sum of credit lines.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_opposite() {
        assert_eq!(EntrySide::Debit.opposite(), EntrySide::Credit);
        assert_eq!(EntrySide::Credit.opposite(), EntrySide::Debit);
    }

    #[test]
    fn test_deposit_adjustment_kinds() {
        assert!(EntryKind::DepositRefund.is_deposit_adjustment());
        assert!(EntryKind::DepositDeduction.is_deposit_adjustment());
        assert!(EntryKind::DepositTransfer.is_deposit_adjustment());
        assert!(!EntryKind::DepositIntake.is_deposit_adjustment());
        assert!(!EntryKind::General.is_deposit_adjustment());
        assert!(!EntryKind::Reversal.is_deposit_adjustment());
    }

    #[test]
    fn test_line_builders() {
        let owner = Uuid::new_v4();
        let line = JournalLineInput::credit(AccountRef::Counterparty("Tenant".into()), dec!(50))
            .with_party(PartyType::Owner, owner)
            .with_memo("note");

        assert_eq!(line.side, EntrySide::Credit);
        assert_eq!(line.party_type, Some(PartyType::Owner));
        assert_eq!(line.party_client_id, Some(owner));
        assert_eq!(line.memo.as_deref(), Some("note"));
    }

    #[test]
    fn test_entry_totals() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);

        let totals = EntryTotals::new(dec!(100.00), dec!(60.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(40.00));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&EntrySide::Debit).ok().as_deref(),
            Some("\"DEBIT\"")
        );
    }
}
