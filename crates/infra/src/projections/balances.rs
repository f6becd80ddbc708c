use std::collections::HashMap;

use fizzy_core::{AccountId, Amount};
use fizzy_events::{EventEnvelope, Projection};
use fizzy_token::TokenEvent;

/// Balances and total supply, derived from `Transfer` notifications only.
///
/// Agrees with the ledger after it has seen the same prefix of the journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceProjection {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
    minted: Amount,
    burned: Amount,
}

impl BalanceProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Lifetime sum of minted units.
    pub fn minted(&self) -> Amount {
        self.minted
    }

    /// Lifetime sum of burned units.
    pub fn burned(&self) -> Amount {
        self.burned
    }

    fn adjust(&mut self, account: AccountId, f: impl FnOnce(Amount) -> Amount) {
        let next = f(self.balance_of(account));
        if next.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, next);
        }
    }
}

impl Projection for BalanceProjection {
    type Ev = TokenEvent;

    fn apply(&mut self, envelope: &EventEnvelope<TokenEvent>) {
        let TokenEvent::Transfer(t) = envelope.payload() else {
            return;
        };

        if t.from.is_null() {
            self.total_supply = self.total_supply.saturating_add(t.amount);
            self.minted = self.minted.saturating_add(t.amount);
        } else {
            self.adjust(t.from, |b| b.saturating_sub(t.amount));
        }

        if t.to.is_null() {
            self.total_supply = self.total_supply.saturating_sub(t.amount);
            self.burned = self.burned.saturating_add(t.amount);
        } else {
            self.adjust(t.to, |b| b.saturating_add(t.amount));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use fizzy_core::LedgerId;
    use fizzy_events::ProjectionRunner;
    use fizzy_token::{Approved, Transferred};

    use super::*;

    fn transfer(ledger_id: LedgerId, seq: u64, from: AccountId, to: AccountId, amount: u128) -> EventEnvelope<TokenEvent> {
        EventEnvelope::new(
            Uuid::now_v7(),
            ledger_id,
            seq,
            TokenEvent::TRANSFER,
            TokenEvent::Transfer(Transferred {
                from,
                to,
                amount: Amount::new(amount),
                occurred_at: Utc::now(),
            }),
        )
    }

    #[test]
    fn tracks_mints_transfers_and_burns() {
        let ledger_id = LedgerId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let approval = EventEnvelope::new(
            Uuid::now_v7(),
            ledger_id,
            3,
            TokenEvent::APPROVAL,
            TokenEvent::Approval(Approved {
                owner: alice,
                spender: bob,
                amount: Amount::new(1),
                occurred_at: Utc::now(),
            }),
        );
        let history = vec![
            transfer(ledger_id, 1, AccountId::NULL, alice, 100),
            transfer(ledger_id, 2, alice, bob, 30),
            approval,
            transfer(ledger_id, 4, bob, AccountId::NULL, 30),
        ];

        let (projection, cursor) =
            ProjectionRunner::rebuild_from_scratch(BalanceProjection::new, &history).unwrap();

        assert_eq!(projection.balance_of(alice), Amount::new(70));
        assert_eq!(projection.balance_of(bob), Amount::ZERO);
        assert_eq!(projection.total_supply(), Amount::new(70));
        assert_eq!(projection.minted(), Amount::new(100));
        assert_eq!(projection.burned(), Amount::new(30));
        assert_eq!(cursor.map(|c| c.last_sequence_number()), Some(4));
    }
}
