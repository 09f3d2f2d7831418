//! Ledger error types.
//!
//! Every public ledger operation fails with a `LedgerError`. Collaborators
//! that speak `AppError` convert through the `From` impl at the bottom.

use chrono::NaiveDate;
use rentledger_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::EntrySide;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Sum of debit lines.
        debit: Decimal,
        /// Sum of credit lines.
        credit: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Counterparty label is blank.
    #[error("Counterparty label cannot be empty")]
    EmptyCounterparty,

    /// Start date after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Bank account must map onto an asset GL account.
    #[error("Invalid bank account: {0}")]
    InvalidBankAccount(String),

    // ========== Lookup Errors ==========
    /// GL account not found (by id or code).
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Company bank account not found (by id or code).
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(String),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Journal line not found.
    #[error("Journal line not found: {0}")]
    LineNotFound(Uuid),

    /// Security deposit not found.
    #[error("Security deposit not found: {0}")]
    DepositNotFound(Uuid),

    /// Rent agreement not found.
    #[error("Rent agreement not found: {0}")]
    RentAgreementNotFound(Uuid),

    // ========== Business Rule Errors ==========
    /// Account or bank account code already taken.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Settlement line on the wrong side.
    #[error("Line {line_id} is not a {expected} line")]
    SideMismatch {
        /// The offending line.
        line_id: Uuid,
        /// The side it should have.
        expected: EntrySide,
    },

    /// Settlement would exceed the line's remaining amount.
    #[error("Cannot match {requested} against line {line_id}: only {remaining} remaining")]
    OverMatch {
        /// The line being matched.
        line_id: Uuid,
        /// Requested match amount.
        requested: Decimal,
        /// Unmatched amount left on the line.
        remaining: Decimal,
    },

    /// Entry already has a reversal.
    #[error("Journal entry {0} is already reversed")]
    AlreadyReversed(Uuid),

    /// Deposit refund or deduction not allowed.
    #[error("Invalid deposit transition: {0}")]
    InvalidTransition(String),

    // ========== Concurrency Errors ==========
    /// The line changed between read and write.
    #[error("Concurrent modification of line {0}, please retry")]
    ConcurrentModification(Uuid),

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::EmptyCounterparty => "EMPTY_COUNTERPARTY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::InvalidBankAccount(_) => "INVALID_BANK_ACCOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::DepositNotFound(_) => "DEPOSIT_NOT_FOUND",
            Self::RentAgreementNotFound(_) => "RENT_AGREEMENT_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::SideMismatch { .. } => "SIDE_MISMATCH",
            Self::OverMatch { .. } => "OVER_MATCH",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::UnbalancedEntry { .. }
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::EmptyCounterparty
            | Self::InvalidDateRange { .. }
            | Self::InvalidBankAccount(_)
            | Self::SideMismatch { .. } => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::BankAccountNotFound(_)
            | Self::EntryNotFound(_)
            | Self::LineNotFound(_)
            | Self::DepositNotFound(_)
            | Self::RentAgreementNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateCode(_)
            | Self::AlreadyReversed(_)
            | Self::ConcurrentModification(_) => 409,

            // 422 Unprocessable - business rules
            Self::OverMatch { .. } | Self::InvalidTransition(_) => 422,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            404 => Self::NotFound(message),
            400 => Self::Validation(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => match err {
                LedgerError::Database(inner) => Self::Database(inner),
                _ => Self::Internal(message),
            },
        }
    }
}
