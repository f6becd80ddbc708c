use std::collections::HashMap;

use chrono::{DateTime, Utc};

use fizzy_auth::{Capability, RoleRegistry, authorize};
use fizzy_core::{AccountId, Aggregate, AggregateRoot, Amount, LedgerError, LedgerId, LedgerResult};

use crate::command::{Approve, Burn, Mint, TokenCommand, Transfer, TransferFrom};
use crate::event::{Approved, TokenEvent, Transferred};
use crate::metadata::TokenMetadata;

/// Aggregate root: a single fungible token ledger.
///
/// Holds balances, allowances and total supply. Zero balances and zero
/// allowances are not stored, so every stored entry is positive and the sum
/// of stored balances equals `total_supply`.
///
/// Approvals overwrite: `approve` sets the allowance, it does not add to it.
/// A spender watching for a replacement approval can spend the old allowance
/// first and then the new one. Owners who need to lower a live allowance
/// should approve zero, wait, then approve the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: LedgerId,
    metadata: TokenMetadata,
    roles: RoleRegistry,
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    total_supply: Amount,
    version: u64,
}

impl Token {
    /// Fresh ledger with zero supply, minted into only by `executor`.
    pub fn new(id: LedgerId, metadata: TokenMetadata, executor: AccountId) -> LedgerResult<Self> {
        Ok(Self::with_roles(id, metadata, RoleRegistry::new(executor)?))
    }

    pub fn with_roles(id: LedgerId, metadata: TokenMetadata, roles: RoleRegistry) -> Self {
        Self {
            id,
            metadata,
            roles,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: Amount::ZERO,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn executor(&self) -> AccountId {
        self.roles.executor()
    }

    pub fn is_executor(&self, account: AccountId) -> bool {
        self.roles.is_executor(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Accounts with a positive balance.
    pub fn holders(&self) -> impl Iterator<Item = (AccountId, Amount)> + '_ {
        self.balances.iter().map(|(account, amount)| (*account, *amount))
    }

    fn set_balance(&mut self, account: AccountId, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance(&mut self, owner: AccountId, spender: AccountId, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }
}

impl AggregateRoot for Token {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Token {
    type Command = TokenCommand;
    type Event = TokenEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        // Events were validated by `handle`; saturation never triggers on a
        // stream this aggregate produced.
        match event {
            TokenEvent::Transfer(e) => {
                if e.from.is_null() {
                    self.total_supply = self.total_supply.saturating_add(e.amount);
                } else {
                    let debited = self.balance_of(e.from).saturating_sub(e.amount);
                    self.set_balance(e.from, debited);
                }

                if e.to.is_null() {
                    self.total_supply = self.total_supply.saturating_sub(e.amount);
                } else {
                    let credited = self.balance_of(e.to).saturating_add(e.amount);
                    self.set_balance(e.to, credited);
                }
            }
            TokenEvent::Approval(e) => {
                self.set_allowance(e.owner, e.spender, e.amount);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            TokenCommand::Mint(cmd) => self.handle_mint(cmd),
            TokenCommand::Burn(cmd) => self.handle_burn(cmd),
            TokenCommand::Transfer(cmd) => self.handle_transfer(cmd),
            TokenCommand::TransferFrom(cmd) => self.handle_transfer_from(cmd),
            TokenCommand::Approve(cmd) => self.handle_approve(cmd),
        }
    }
}

impl Token {
    /// Balance of `account` after removing `amount`.
    fn debit(&self, account: AccountId, amount: Amount) -> LedgerResult<Amount> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account,
                available,
                required: amount,
            })
    }

    /// Check that moving `amount` out of `from` (already debited to
    /// `remaining`) and into `to` fits.
    fn ensure_credit(
        &self,
        from: AccountId,
        remaining: Amount,
        to: AccountId,
        amount: Amount,
    ) -> LedgerResult<()> {
        let current = if from == to { remaining } else { self.balance_of(to) };
        current.checked_add(amount).map(|_| ())
    }

    fn handle_mint(&self, cmd: &Mint) -> LedgerResult<Vec<TokenEvent>> {
        authorize(&self.roles, cmd.caller, &Capability::MINT)?;
        let to = cmd.to.ensure_not_null("mint recipient")?;

        self.total_supply.checked_add(cmd.amount)?;
        self.balance_of(to).checked_add(cmd.amount)?;

        Ok(vec![transferred(AccountId::NULL, to, cmd.amount, cmd.occurred_at)])
    }

    fn handle_burn(&self, cmd: &Burn) -> LedgerResult<Vec<TokenEvent>> {
        let holder = cmd.caller.ensure_not_null("burn holder")?;
        self.debit(holder, cmd.amount)?;

        Ok(vec![transferred(holder, AccountId::NULL, cmd.amount, cmd.occurred_at)])
    }

    fn handle_transfer(&self, cmd: &Transfer) -> LedgerResult<Vec<TokenEvent>> {
        let from = cmd.caller.ensure_not_null("sender")?;
        let to = cmd.to.ensure_not_null("recipient")?;

        let remaining = self.debit(from, cmd.amount)?;
        self.ensure_credit(from, remaining, to, cmd.amount)?;

        Ok(vec![transferred(from, to, cmd.amount, cmd.occurred_at)])
    }

    fn handle_transfer_from(&self, cmd: &TransferFrom) -> LedgerResult<Vec<TokenEvent>> {
        let spender = cmd.caller.ensure_not_null("spender")?;
        let from = cmd.from.ensure_not_null("sender")?;
        let to = cmd.to.ensure_not_null("recipient")?;

        let available = self.allowance(from, spender);
        let remaining_allowance =
            available
                .checked_sub(cmd.amount)
                .ok_or(LedgerError::InsufficientAllowance {
                    owner: from,
                    spender,
                    available,
                    required: cmd.amount,
                })?;

        let remaining = self.debit(from, cmd.amount)?;
        self.ensure_credit(from, remaining, to, cmd.amount)?;

        Ok(vec![
            TokenEvent::Approval(Approved {
                owner: from,
                spender,
                amount: remaining_allowance,
                occurred_at: cmd.occurred_at,
            }),
            transferred(from, to, cmd.amount, cmd.occurred_at),
        ])
    }

    fn handle_approve(&self, cmd: &Approve) -> LedgerResult<Vec<TokenEvent>> {
        let owner = cmd.caller.ensure_not_null("owner")?;
        let spender = cmd.spender.ensure_not_null("spender")?;

        Ok(vec![TokenEvent::Approval(Approved {
            owner,
            spender,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }
}

fn transferred(from: AccountId, to: AccountId, amount: Amount, occurred_at: DateTime<Utc>) -> TokenEvent {
    TokenEvent::Transfer(Transferred {
        from,
        to,
        amount,
        occurred_at,
    })
}
