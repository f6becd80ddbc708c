use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fizzy_core::{AccountId, Amount};

/// Command: create `amount` new units for `to`. Executor only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub caller: AccountId,
    pub to: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: destroy `amount` units of the caller's own balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burn {
    pub caller: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: move `amount` from the caller to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub caller: AccountId,
    pub to: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: move `amount` from `from` to `to`, spending the caller's allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFrom {
    pub caller: AccountId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: set the allowance of `spender` over the caller's balance to `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approve {
    pub caller: AccountId,
    pub spender: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCommand {
    Mint(Mint),
    Burn(Burn),
    Transfer(Transfer),
    TransferFrom(TransferFrom),
    Approve(Approve),
}

impl TokenCommand {
    pub fn mint(caller: AccountId, to: AccountId, amount: Amount, occurred_at: DateTime<Utc>) -> Self {
        Self::Mint(Mint {
            caller,
            to,
            amount,
            occurred_at,
        })
    }

    pub fn burn(caller: AccountId, amount: Amount, occurred_at: DateTime<Utc>) -> Self {
        Self::Burn(Burn {
            caller,
            amount,
            occurred_at,
        })
    }

    pub fn transfer(
        caller: AccountId,
        to: AccountId,
        amount: Amount,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::Transfer(Transfer {
            caller,
            to,
            amount,
            occurred_at,
        })
    }

    pub fn transfer_from(
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::TransferFrom(TransferFrom {
            caller,
            from,
            to,
            amount,
            occurred_at,
        })
    }

    pub fn approve(
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::Approve(Approve {
            caller,
            spender,
            amount,
            occurred_at,
        })
    }

    /// The account on whose authority the command runs.
    pub fn caller(&self) -> AccountId {
        match self {
            TokenCommand::Mint(c) => c.caller,
            TokenCommand::Burn(c) => c.caller,
            TokenCommand::Transfer(c) => c.caller,
            TokenCommand::TransferFrom(c) => c.caller,
            TokenCommand::Approve(c) => c.caller,
        }
    }

    /// Operation name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            TokenCommand::Mint(_) => "mint",
            TokenCommand::Burn(_) => "burn",
            TokenCommand::Transfer(_) => "transfer",
            TokenCommand::TransferFrom(_) => "transfer_from",
            TokenCommand::Approve(_) => "approve",
        }
    }
}
