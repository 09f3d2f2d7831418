//! Security deposit rules and postings.
//!
//! Status table:
//!
//! | refund | deduct | status              |
//! |--------|--------|---------------------|
//! | > 0    | 0      | REFUNDED            |
//! | > 0    | > 0    | PARTIALLY_REFUNDED  |
//! | 0      | > 0    | FORFEITED           |
//! | 0      | 0      | rejected            |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{DepositAccounts, DepositParties, DepositStatus, RefundDepositInput, RefundPlan};
use crate::ledger::{
    AccountRef, CreateJournalEntryInput, EntryKind, JournalLineInput, LedgerError, LedgerService,
    LineLinks, PartyType,
};

/// Stateless deposit workflow rules.
pub struct DepositService;

impl DepositService {
    /// Status after refunding `refund` and keeping `deduct`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when both are zero.
    pub fn resolve_status(refund: Decimal, deduct: Decimal) -> Result<DepositStatus, LedgerError> {
        match (refund > Decimal::ZERO, deduct > Decimal::ZERO) {
            (true, false) => Ok(DepositStatus::Refunded),
            (true, true) => Ok(DepositStatus::PartiallyRefunded),
            (false, true) => Ok(DepositStatus::Forfeited),
            (false, false) => Err(LedgerError::InvalidTransition(
                "refund and deduction cannot both be zero".to_string(),
            )),
        }
    }

    /// Validates a refund request against the deposit amount.
    ///
    /// # Errors
    ///
    /// `NegativeAmount` for negative inputs, `InvalidTransition` when the
    /// total is zero or exceeds the deposit.
    pub fn plan_refund(
        deposit_amount: Decimal,
        input: &RefundDepositInput,
    ) -> Result<RefundPlan, LedgerError> {
        if input.refund < Decimal::ZERO || input.deduct < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        let status = Self::resolve_status(input.refund, input.deduct)?;
        let total = input.refund + input.deduct;
        if total > deposit_amount {
            return Err(LedgerError::InvalidTransition(format!(
                "refund {} plus deduction {} exceeds deposit {deposit_amount}",
                input.refund, input.deduct
            )));
        }

        let transfer =
            (input.move_deduct_cash && input.deduct > Decimal::ZERO).then_some(input.deduct);

        Ok(RefundPlan {
            status,
            refund: input.refund,
            deduct: input.deduct,
            transfer,
        })
    }

    fn links(parties: &DepositParties, payment_id: Option<Uuid>) -> LineLinks {
        LineLinks {
            property_id: Some(parties.property_id),
            unit_id: Some(parties.unit_id),
            rent_agreement_id: Some(parties.rent_agreement_id),
            payment_id,
            security_deposit_id: Some(parties.deposit_id),
            ..LineLinks::default()
        }
    }

    fn liability(accounts: &DepositAccounts) -> AccountRef {
        AccountRef::GlAccount(accounts.liability_account_id)
    }

    /// Intake entry: DEBIT deposit bank / CREDIT liability.
    ///
    /// The credit line is the anchor every later settlement matches against.
    ///
    /// # Errors
    ///
    /// `ZeroAmount`/`NegativeAmount` for a non-positive amount.
    pub fn intake_entry(
        parties: &DepositParties,
        accounts: &DepositAccounts,
        amount: Decimal,
        received_at: NaiveDate,
        payment_id: Uuid,
    ) -> Result<CreateJournalEntryInput, LedgerError> {
        LedgerService::validate_amount(amount)?;
        let links = Self::links(parties, Some(payment_id));
        Ok(CreateJournalEntryInput::new(
            "Security deposit received",
            received_at,
            vec![
                JournalLineInput::debit(AccountRef::BankAccount(accounts.deposit_bank_id), amount)
                    .with_party(PartyType::Renter, parties.renter_id)
                    .with_links(links.clone()),
                JournalLineInput::credit(Self::liability(accounts), amount)
                    .with_party(PartyType::Renter, parties.renter_id)
                    .with_links(links),
            ],
        )
        .with_kind(EntryKind::DepositIntake))
    }

    /// Entries posted for a refund plan, in posting order: refund,
    /// deduction, transfer.
    ///
    /// In the refund and deduction entries the liability line comes first.
    #[must_use]
    pub fn adjustment_entries(
        plan: &RefundPlan,
        parties: &DepositParties,
        accounts: &DepositAccounts,
        date: NaiveDate,
        reason: Option<&str>,
    ) -> Vec<CreateJournalEntryInput> {
        let links = Self::links(parties, None);
        let mut entries = Vec::new();

        if plan.refund > Decimal::ZERO {
            entries.push(
                CreateJournalEntryInput::new(
                    "Security deposit refund",
                    date,
                    vec![
                        JournalLineInput::debit(Self::liability(accounts), plan.refund)
                            .with_party(PartyType::Renter, parties.renter_id)
                            .with_links(links.clone()),
                        JournalLineInput::credit(
                            AccountRef::BankAccount(accounts.deposit_bank_id),
                            plan.refund,
                        )
                        .with_links(links.clone()),
                    ],
                )
                .with_kind(EntryKind::DepositRefund),
            );
        }

        if plan.deduct > Decimal::ZERO {
            let description = match reason {
                Some(reason) => format!("Security deposit deduction: {reason}"),
                None => "Security deposit deduction".to_string(),
            };
            entries.push(
                CreateJournalEntryInput::new(
                    description,
                    date,
                    vec![
                        JournalLineInput::debit(Self::liability(accounts), plan.deduct)
                            .with_party(PartyType::Renter, parties.renter_id)
                            .with_links(links.clone()),
                        JournalLineInput::credit(
                            AccountRef::GlAccount(accounts.forfeiture_account_id),
                            plan.deduct,
                        )
                        .with_links(links.clone()),
                    ],
                )
                .with_kind(EntryKind::DepositDeduction),
            );
        }

        if let Some(transfer) = plan.transfer {
            entries.push(
                CreateJournalEntryInput::new(
                    "Deducted deposit moved to operating bank",
                    date,
                    vec![
                        JournalLineInput::debit(
                            AccountRef::BankAccount(accounts.operating_bank_id),
                            transfer,
                        )
                        .with_links(links.clone()),
                        JournalLineInput::credit(
                            AccountRef::BankAccount(accounts.deposit_bank_id),
                            transfer,
                        )
                        .with_links(links.clone()),
                    ],
                )
                .with_kind(EntryKind::DepositTransfer),
            );
        }

        entries
    }
}
