use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fizzy_core::{AccountId, Amount};
use fizzy_events::Event;

/// Event: units moved from `from` to `to`.
///
/// `from` is [`AccountId::NULL`] for a mint, `to` is [`AccountId::NULL`] for a burn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transferred {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: the allowance of `spender` over `owner`'s balance is now `amount`.
///
/// Emitted by `approve` and, with the reduced remainder, by `transfer_from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approved {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    Transfer(Transferred),
    Approval(Approved),
}

impl TokenEvent {
    pub const TRANSFER: &'static str = "token.transfer";
    pub const APPROVAL: &'static str = "token.approval";

    pub fn is_mint(&self) -> bool {
        matches!(self, TokenEvent::Transfer(t) if t.from.is_null())
    }

    pub fn is_burn(&self) -> bool {
        matches!(self, TokenEvent::Transfer(t) if t.to.is_null())
    }
}

impl Event for TokenEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TokenEvent::Transfer(_) => Self::TRANSFER,
            TokenEvent::Approval(_) => Self::APPROVAL,
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TokenEvent::Transfer(e) => e.occurred_at,
            TokenEvent::Approval(e) => e.occurred_at,
        }
    }
}
