//! Security deposit workflow rules.
//!
//! Intake, refund and forfeiture postings plus the status state machine.
//! The db crate runs these inside one transaction per call.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::DepositService;
pub use types::{
    CreateDepositInput, DepositAccounts, DepositParties, DepositStatus, RefundDepositInput,
    RefundPlan,
};
