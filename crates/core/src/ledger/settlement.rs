//! Settlement rules: matching debit lines against credit lines.
//!
//! A line can be matched in several settlements as long as the live
//! (non-released) matched amounts never exceed the line amount.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::EntrySide;

/// One requested debit/credit match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementMatch {
    /// The debit line.
    pub debit_line_id: Uuid,
    /// The credit line.
    pub credit_line_id: Uuid,
    /// Amount to match on both lines.
    pub amount: Decimal,
    /// Note stored on both settlement lines.
    pub note: Option<String>,
}

/// Input for `settleLines`.
#[derive(Debug, Clone, Default)]
pub struct SettleLinesInput {
    /// Matches, applied in order.
    pub matches: Vec<SettlementMatch>,
    /// Note stored on every settlement.
    pub note: Option<String>,
}

/// Matching state of a line at the time of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatchState {
    /// Line id.
    pub line_id: Uuid,
    /// Line side.
    pub side: EntrySide,
    /// Line amount.
    pub amount: Decimal,
    /// Sum of live matched amounts.
    pub matched: Decimal,
}

impl LineMatchState {
    /// Unmatched amount left on the line.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        SettlementService::remaining(self.amount, self.matched)
    }

    fn check(&self, expected: EntrySide, requested: Decimal) -> Result<(), LedgerError> {
        if self.side != expected {
            return Err(LedgerError::SideMismatch {
                line_id: self.line_id,
                expected,
            });
        }
        let remaining = self.remaining();
        if requested > remaining {
            return Err(LedgerError::OverMatch {
                line_id: self.line_id,
                requested,
                remaining,
            });
        }
        Ok(())
    }
}

/// Result of `checkForFullyPaidByPaymentId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentStatus {
    /// `matched >= target`.
    pub fully_paid: bool,
    /// Live matched amount on the payment's debit lines.
    pub matched: Decimal,
    /// Amount the caller expects.
    pub target: Decimal,
}

/// Stateless settlement rules.
pub struct SettlementService;

impl SettlementService {
    /// Checks one match against the current state of both lines.
    ///
    /// # Errors
    ///
    /// `ZeroAmount`/`NegativeAmount`, `SideMismatch` if the lines are on the
    /// wrong sides, `OverMatch` if either line has less than `amount` left.
    pub fn validate_match(
        debit: &LineMatchState,
        credit: &LineMatchState,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        debit.check(EntrySide::Debit, amount)?;
        credit.check(EntrySide::Credit, amount)?;
        Ok(())
    }

    /// `amount - matched`, never below zero.
    #[must_use]
    pub fn remaining(amount: Decimal, matched: Decimal) -> Decimal {
        (amount - matched).max(Decimal::ZERO)
    }

    /// Payment status from the live matched sum.
    #[must_use]
    pub fn payment_status(matched: Decimal, target: Decimal) -> PaymentStatus {
        PaymentStatus {
            fully_paid: matched >= target,
            matched,
            target,
        }
    }
}
