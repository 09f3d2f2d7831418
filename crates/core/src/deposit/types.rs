//! Security deposit domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a security deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStatus {
    /// Held, nothing paid out or kept yet.
    Active,
    /// Part refunded, part kept.
    PartiallyRefunded,
    /// Refunded without deductions.
    Refunded,
    /// Kept without refund.
    Forfeited,
}

impl DepositStatus {
    /// Stable string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::PartiallyRefunded => "PARTIALLY_REFUNDED",
            Self::Refunded => "REFUNDED",
            Self::Forfeited => "FORFEITED",
        }
    }
}

/// Input for `createDeposit`.
#[derive(Debug, Clone)]
pub struct CreateDepositInput {
    /// Amount received.
    pub amount: Decimal,
    /// Rent agreement the deposit secures.
    pub rent_agreement_id: Uuid,
    /// Date received.
    pub received_at: NaiveDate,
}

/// Input for `refundDeposit`.
#[derive(Debug, Clone)]
pub struct RefundDepositInput {
    /// The deposit.
    pub deposit_id: Uuid,
    /// Amount paid back to the renter.
    pub refund: Decimal,
    /// Amount kept.
    pub deduct: Decimal,
    /// Why the deduction was made.
    pub reason: Option<String>,
    /// Date of the refund.
    pub refunded_at: NaiveDate,
    /// Move the kept cash from the deposit bank to the operating bank.
    pub move_deduct_cash: bool,
}

/// Links every deposit posting carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositParties {
    /// The deposit.
    pub deposit_id: Uuid,
    /// Renter who paid it.
    pub renter_id: Uuid,
    /// Unit rented.
    pub unit_id: Uuid,
    /// Property of the unit.
    pub property_id: Uuid,
    /// Agreement secured.
    pub rent_agreement_id: Uuid,
}

/// Accounts the deposit workflow posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositAccounts {
    /// Bank account holding deposits.
    pub deposit_bank_id: Uuid,
    /// Operating bank account.
    pub operating_bank_id: Uuid,
    /// Tenant security deposits liability (GL).
    pub liability_account_id: Uuid,
    /// Forfeited deposits revenue (GL).
    pub forfeiture_account_id: Uuid,
}

/// What a refund call will post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundPlan {
    /// Status after the refund.
    pub status: DepositStatus,
    /// Amount refunded.
    pub refund: Decimal,
    /// Amount deducted.
    pub deduct: Decimal,
    /// Cash moved to the operating bank, if any.
    pub transfer: Option<Decimal>,
}
