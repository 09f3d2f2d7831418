//! Core business logic for Rentledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping: entries, settlement, reversal
//! - `reports` - Running-balance ledgers and trial balance
//! - `deposit` - Security deposit lifecycle

pub mod deposit;
pub mod ledger;
pub mod reports;
