//! Ledger service: serialized command execution over a single token ledger.
//!
//! ```text
//! command
//!   -> write lock
//!   -> Token::handle     (decide, no mutation)
//!   -> EventStore::append (ExpectedVersion::Exact(version))
//!   -> Token::apply      (evolve)
//!   -> EventBus::publish (one envelope per committed event)
//!   -> unlock
//! ```
//!
//! Holding the write lock across the whole pipeline makes each operation's
//! checks and effects atomic with respect to every other operation, and keeps
//! bus delivery in journal order.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use fizzy_auth::{AuthorizationExplanation, Capability, explain_authorization};
use fizzy_core::{AccountId, Aggregate, AggregateRoot, Amount, ExpectedVersion, LedgerError, LedgerId};
use fizzy_events::{EventBus, EventEnvelope, Subscription};
use fizzy_token::{Token, TokenCommand, TokenEvent, TokenMetadata};

use crate::config::LedgerConfig;
use crate::journal::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The ledger rejected the command; nothing was committed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("journal error: {0}")]
    Store(#[from] EventStoreError),

    /// State is committed and journaled; bus delivery failed.
    #[error("committed but not published: {0}")]
    Publish(String),

    #[error("ledger lock poisoned")]
    Poisoned,

    #[error("failed to decode journaled event: {0}")]
    Deserialize(String),
}

impl ServiceError {
    /// The domain error, when the ledger itself rejected the command.
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        match self {
            ServiceError::Ledger(err) => Some(err),
            _ => None,
        }
    }
}

/// Thread-safe front for one [`Token`] ledger, backed by a journal and a bus.
///
/// - `S`: journal ([`EventStore`])
/// - `B`: notification bus carrying JSON envelopes
#[derive(Debug)]
pub struct LedgerService<S, B> {
    ledger_id: LedgerId,
    token: RwLock<Token>,
    store: S,
    bus: B,
}

impl<S, B> LedgerService<S, B>
where
    S: EventStore,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Fresh ledger with zero supply.
    ///
    /// The journal stream for `config.ledger_id` is expected to be empty; a
    /// non-empty one makes the first append fail with a concurrency error.
    /// Use [`LedgerService::rehydrate`] to resume an existing ledger.
    pub fn new(config: &LedgerConfig, store: S, bus: B) -> Result<Self, ServiceError> {
        let token = Token::new(config.ledger_id, config.metadata.clone(), config.executor)?;
        Ok(Self::from_token(token, store, bus))
    }

    /// Rebuild the ledger by replaying its journal stream.
    pub fn rehydrate(config: &LedgerConfig, store: S, bus: B) -> Result<Self, ServiceError> {
        let mut token = Token::new(config.ledger_id, config.metadata.clone(), config.executor)?;
        let history = store.load_stream(config.ledger_id)?;

        for stored in &history {
            if stored.ledger_id != config.ledger_id {
                return Err(EventStoreError::LedgerMismatch(format!(
                    "event {} belongs to ledger {}",
                    stored.event_id, stored.ledger_id
                ))
                .into());
            }
            let expected = token.version() + 1;
            if stored.sequence_number != expected {
                return Err(EventStoreError::InvalidAppend(format!(
                    "gap in journal (expected sequence {expected}, found {})",
                    stored.sequence_number
                ))
                .into());
            }

            let event: TokenEvent = stored
                .decode()
                .map_err(|e| ServiceError::Deserialize(e.to_string()))?;
            token.apply(&event);
        }

        debug!(
            ledger_id = %config.ledger_id,
            version = token.version(),
            total_supply = %token.total_supply(),
            "ledger rehydrated from journal"
        );

        Ok(Self::from_token(token, store, bus))
    }

    /// Run one command through the full pipeline.
    ///
    /// Returns the journaled events. On any ledger error nothing is appended,
    /// applied or published.
    pub fn execute(&self, command: TokenCommand) -> Result<Vec<StoredEvent>, ServiceError> {
        let mut token = self.write()?;

        let decided = match token.handle(&command) {
            Ok(events) => events,
            Err(err) => {
                debug!(
                    ledger_id = %self.ledger_id,
                    op = command.name(),
                    caller = %command.caller(),
                    error = %err,
                    "command rejected"
                );
                return Err(err.into());
            }
        };

        let uncommitted = decided
            .iter()
            .map(|event| UncommittedEvent::from_typed(self.ledger_id, Uuid::now_v7(), event))
            .collect::<Result<Vec<_>, _>>()?;

        let committed = self
            .store
            .append(uncommitted, ExpectedVersion::Exact(token.version()))?;

        for event in &decided {
            token.apply(event);
        }

        debug!(
            ledger_id = %self.ledger_id,
            op = command.name(),
            caller = %command.caller(),
            version = token.version(),
            "command committed"
        );

        // Every committed event gets a publish attempt, even after a failure.
        let mut failed = Vec::new();
        for stored in &committed {
            if let Err(err) = self.bus.publish(stored.to_envelope()) {
                warn!(
                    ledger_id = %self.ledger_id,
                    sequence_number = stored.sequence_number,
                    error = ?err,
                    "failed to publish committed event"
                );
                failed.push(format!("sequence {}: {err:?}", stored.sequence_number));
            }
        }
        if !failed.is_empty() {
            return Err(ServiceError::Publish(failed.join("; ")));
        }

        Ok(committed)
    }

    pub fn mint(&self, caller: AccountId, to: AccountId, amount: Amount) -> Result<Vec<StoredEvent>, ServiceError> {
        self.execute(TokenCommand::mint(caller, to, amount, Utc::now()))
    }

    pub fn burn(&self, caller: AccountId, amount: Amount) -> Result<Vec<StoredEvent>, ServiceError> {
        self.execute(TokenCommand::burn(caller, amount, Utc::now()))
    }

    pub fn transfer(&self, caller: AccountId, to: AccountId, amount: Amount) -> Result<Vec<StoredEvent>, ServiceError> {
        self.execute(TokenCommand::transfer(caller, to, amount, Utc::now()))
    }

    pub fn transfer_from(
        &self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<Vec<StoredEvent>, ServiceError> {
        self.execute(TokenCommand::transfer_from(caller, from, to, amount, Utc::now()))
    }

    pub fn approve(
        &self,
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<Vec<StoredEvent>, ServiceError> {
        self.execute(TokenCommand::approve(caller, spender, amount, Utc::now()))
    }

    /// Full journal stream for this ledger.
    pub fn history(&self) -> Result<Vec<StoredEvent>, ServiceError> {
        Ok(self.store.load_stream(self.ledger_id)?)
    }

    /// Notifications for every event committed after this call.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<JsonValue>> {
        self.bus.subscribe()
    }
}

impl<S, B> LedgerService<S, B> {
    fn from_token(token: Token, store: S, bus: B) -> Self {
        Self {
            ledger_id: token.id_typed(),
            token: RwLock::new(token),
            store,
            bus,
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Token>, ServiceError> {
        self.token.write().map_err(|_| ServiceError::Poisoned)
    }

    fn snapshot_guard(&self) -> Result<RwLockReadGuard<'_, Token>, ServiceError> {
        self.token.read().map_err(|_| ServiceError::Poisoned)
    }

    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    /// Run `f` against a consistent view of the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&Token) -> R) -> Result<R, ServiceError> {
        let token = self.snapshot_guard()?;
        Ok(f(&token))
    }

    /// Owned copy of the current ledger state.
    pub fn snapshot(&self) -> Result<Token, ServiceError> {
        self.read(Token::clone)
    }

    pub fn balance_of(&self, account: AccountId) -> Result<Amount, ServiceError> {
        self.read(|t| t.balance_of(account))
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Result<Amount, ServiceError> {
        self.read(|t| t.allowance(owner, spender))
    }

    pub fn total_supply(&self) -> Result<Amount, ServiceError> {
        self.read(|t| t.total_supply())
    }

    pub fn version(&self) -> Result<u64, ServiceError> {
        self.read(|t| t.version())
    }

    pub fn metadata(&self) -> Result<TokenMetadata, ServiceError> {
        self.read(|t| t.metadata().clone())
    }

    pub fn name(&self) -> Result<String, ServiceError> {
        self.read(|t| t.name().to_string())
    }

    pub fn symbol(&self) -> Result<String, ServiceError> {
        self.read(|t| t.symbol().to_string())
    }

    pub fn decimals(&self) -> Result<u8, ServiceError> {
        self.read(|t| t.decimals())
    }

    /// Why `account` may or may not mint.
    pub fn explain_mint(&self, account: AccountId) -> Result<AuthorizationExplanation, ServiceError> {
        self.read(|t| explain_authorization(t.roles(), account, &Capability::MINT))
    }
}
