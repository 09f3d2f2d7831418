//! Tests for the deposit state machine and postings.

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::DepositService;
use super::types::{DepositAccounts, DepositParties, DepositStatus, RefundDepositInput, RefundPlan};
use crate::ledger::{AccountRef, EntryKind, EntrySide, LedgerError, LedgerService, PartyType};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()
}

fn request(refund: Decimal, deduct: Decimal, move_cash: bool) -> RefundDepositInput {
    RefundDepositInput {
        deposit_id: Uuid::new_v4(),
        refund,
        deduct,
        reason: Some("Carpet cleaning".to_string()),
        refunded_at: date(),
        move_deduct_cash: move_cash,
    }
}

fn parties() -> DepositParties {
    DepositParties {
        deposit_id: Uuid::new_v4(),
        renter_id: Uuid::new_v4(),
        unit_id: Uuid::new_v4(),
        property_id: Uuid::new_v4(),
        rent_agreement_id: Uuid::new_v4(),
    }
}

fn accounts() -> DepositAccounts {
    DepositAccounts {
        deposit_bank_id: Uuid::new_v4(),
        operating_bank_id: Uuid::new_v4(),
        liability_account_id: Uuid::new_v4(),
        forfeiture_account_id: Uuid::new_v4(),
    }
}

#[rstest]
#[case(dec!(1000), dec!(0), DepositStatus::Refunded)]
#[case(dec!(800), dec!(200), DepositStatus::PartiallyRefunded)]
#[case(dec!(0), dec!(1000), DepositStatus::Forfeited)]
#[case(dec!(0), dec!(1), DepositStatus::Forfeited)]
fn test_status_table(
    #[case] refund: Decimal,
    #[case] deduct: Decimal,
    #[case] expected: DepositStatus,
) {
    assert_eq!(DepositService::resolve_status(refund, deduct).unwrap(), expected);
}

#[test]
fn test_zero_refund_and_deduct_rejected() {
    assert!(matches!(
        DepositService::plan_refund(dec!(1000), &request(dec!(0), dec!(0), false)),
        Err(LedgerError::InvalidTransition(_))
    ));
}

#[test]
fn test_exceeding_deposit_rejected() {
    assert!(matches!(
        DepositService::plan_refund(dec!(1000), &request(dec!(900), dec!(200), false)),
        Err(LedgerError::InvalidTransition(_))
    ));
}

#[test]
fn test_negative_inputs_rejected() {
    assert!(matches!(
        DepositService::plan_refund(dec!(1000), &request(dec!(-1), dec!(5), false)),
        Err(LedgerError::NegativeAmount)
    ));
}

#[test]
fn test_transfer_only_with_deduction_and_flag() {
    let plan = DepositService::plan_refund(dec!(1000), &request(dec!(800), dec!(200), true)).unwrap();
    assert_eq!(plan.transfer, Some(dec!(200)));

    let plan = DepositService::plan_refund(dec!(1000), &request(dec!(800), dec!(200), false)).unwrap();
    assert_eq!(plan.transfer, None);

    let plan = DepositService::plan_refund(dec!(1000), &request(dec!(1000), dec!(0), true)).unwrap();
    assert_eq!(plan.transfer, None);
}

#[test]
fn test_intake_entry_shape() {
    let parties = parties();
    let accounts = accounts();
    let payment = Uuid::new_v4();

    let entry = DepositService::intake_entry(&parties, &accounts, dec!(1000), date(), payment).unwrap();

    assert_eq!(entry.kind, EntryKind::DepositIntake);
    assert_eq!(entry.lines[0].side, EntrySide::Debit);
    assert_eq!(entry.lines[0].account, AccountRef::BankAccount(accounts.deposit_bank_id));
    let anchor = &entry.lines[1];
    assert_eq!(anchor.side, EntrySide::Credit);
    assert_eq!(anchor.account, AccountRef::GlAccount(accounts.liability_account_id));
    assert_eq!(anchor.party_type, Some(PartyType::Renter));
    assert_eq!(anchor.party_client_id, Some(parties.renter_id));
    assert_eq!(anchor.links.payment_id, Some(payment));
    assert_eq!(anchor.links.security_deposit_id, Some(parties.deposit_id));
    assert!(LedgerService::validate_entry(&entry, |_| Ok(())).is_ok());
}

#[test]
fn test_intake_rejects_zero() {
    assert!(matches!(
        DepositService::intake_entry(&parties(), &accounts(), dec!(0), date(), Uuid::new_v4()),
        Err(LedgerError::ZeroAmount)
    ));
}

#[test]
fn test_adjustment_entries_for_partial_refund_with_transfer() {
    let accounts = accounts();
    let plan = RefundPlan {
        status: DepositStatus::PartiallyRefunded,
        refund: dec!(800),
        deduct: dec!(200),
        transfer: Some(dec!(200)),
    };

    let entries =
        DepositService::adjustment_entries(&plan, &parties(), &accounts, date(), Some("Carpet"));

    let kinds: Vec<EntryKind> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EntryKind::DepositRefund, EntryKind::DepositDeduction, EntryKind::DepositTransfer]
    );
    assert_eq!(entries[1].description, "Security deposit deduction: Carpet");
    assert_eq!(
        entries[1].lines[1].account,
        AccountRef::GlAccount(accounts.forfeiture_account_id)
    );
    assert_eq!(
        entries[2].lines[0].account,
        AccountRef::BankAccount(accounts.operating_bank_id)
    );
    for entry in &entries {
        assert!(LedgerService::validate_entry(entry, |_| Ok(())).is_ok());
        assert!(entry.lines.iter().all(|l| l.links.payment_id.is_none()));
    }
}

#[test]
fn test_forfeiture_posts_only_deduction() {
    let accounts = accounts();
    let plan = RefundPlan {
        status: DepositStatus::Forfeited,
        refund: dec!(0),
        deduct: dec!(500),
        transfer: None,
    };
    let entries = DepositService::adjustment_entries(&plan, &parties(), &accounts, date(), None);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::DepositDeduction);
    assert_eq!(entries[0].description, "Security deposit deduction");
    assert_eq!(
        entries[0].lines[0].account,
        AccountRef::GlAccount(accounts.liability_account_id)
    );
}

fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..200_000i64).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An accepted plan never pays out or keeps more than the deposit, and
    /// its status always follows the table.
    #[test]
    fn prop_refund_bound(
        amount in (1i64..200_000i64).prop_map(|c| Decimal::new(c, 2)),
        refund in cents(),
        deduct in cents(),
    ) {
        match DepositService::plan_refund(amount, &request(refund, deduct, true)) {
            Ok(plan) => {
                prop_assert!(plan.refund + plan.deduct <= amount);
                prop_assert!(plan.refund + plan.deduct > Decimal::ZERO);
                let expected = DepositService::resolve_status(refund, deduct).unwrap();
                prop_assert_eq!(plan.status, expected);
            }
            Err(LedgerError::InvalidTransition(_)) => {
                prop_assert!(refund + deduct > amount || refund + deduct == Decimal::ZERO);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }
}
