//! Ledger error model.

use thiserror::Error;

use crate::amount::Amount;
use crate::id::AccountId;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is a deterministic, synchronous precondition failure: the
/// operation that produced it committed nothing and emitted nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller lacks the capability the operation requires (e.g. minting).
    #[error("unauthorized: {account} is not permitted to {action}")]
    Unauthorized { account: AccountId, action: String },

    /// The null account (or an unparseable id) was used where a real account is required.
    #[error("invalid account: {0}")]
    InvalidAccount(String),

    /// The holder's balance does not cover the requested amount.
    #[error("insufficient balance: {account} holds {available}, needs {required}")]
    InsufficientBalance {
        account: AccountId,
        available: Amount,
        required: Amount,
    },

    /// The spender's allowance does not cover the requested amount.
    #[error(
        "insufficient allowance: {spender} may move {available} from {owner}, needs {required}"
    )]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        available: Amount,
        required: Amount,
    },

    /// A balance or the total supply would exceed the representable range.
    #[error("amount overflow")]
    Overflow,

    /// Stale version / optimistic concurrency conflict.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl LedgerError {
    pub fn unauthorized(account: AccountId, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            account,
            action: action.into(),
        }
    }

    pub fn invalid_account(msg: impl Into<String>) -> Self {
        Self::InvalidAccount(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Stable machine-readable code for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidAccount(_) => "invalid_account",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InsufficientAllowance { .. } => "insufficient_allowance",
            Self::Overflow => "overflow",
            Self::Conflict(_) => "conflict",
        }
    }
}
