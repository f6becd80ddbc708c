use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use uuid::Uuid;

use fizzy_core::{ExpectedVersion, LedgerId};
use fizzy_events::EventEnvelope;

/// An event ready to be appended (not yet assigned a sequence number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommittedEvent {
    pub event_id: Uuid,
    pub ledger_id: LedgerId,

    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,

    pub payload: JsonValue,
}

/// An event in the journal, with its assigned position.
///
/// Sequence numbers start at 1, increase by one per event, and equal the
/// ledger version right after the event was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub event_id: Uuid,
    pub ledger_id: LedgerId,

    pub sequence_number: u64,

    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,

    pub payload: JsonValue,
}

impl StoredEvent {
    /// Envelope for publication on the bus.
    pub fn to_envelope(&self) -> EventEnvelope<JsonValue> {
        EventEnvelope::new(
            self.event_id,
            self.ledger_id,
            self.sequence_number,
            self.event_type.clone(),
            self.payload.clone(),
        )
    }

    /// Decode the payload back into the typed domain event.
    pub fn decode<E>(&self) -> Result<E, EventStoreError>
    where
        E: DeserializeOwned,
    {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| EventStoreError::Serialization(format!("event {}: {e}", self.sequence_number)))
    }
}

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("ledger mismatch: {0}")]
    LedgerMismatch(String),

    #[error("invalid append: {0}")]
    InvalidAppend(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("journal lock poisoned")]
    Poisoned,
}

/// Append-only journal, one stream per ledger.
///
/// `append()` must:
/// - reject batches that mix ledgers
/// - check `expected_version` against the current stream length
/// - assign sequence numbers `current + 1 ..` with no gaps
/// - persist the batch atomically (all or nothing)
pub trait EventStore: Send + Sync {
    fn append(
        &self,
        events: Vec<UncommittedEvent>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEvent>, EventStoreError>;

    /// Full stream for a ledger, in sequence order (empty if none).
    fn load_stream(&self, ledger_id: LedgerId) -> Result<Vec<StoredEvent>, EventStoreError>;
}

impl<S> EventStore for Arc<S>
where
    S: EventStore + ?Sized,
{
    fn append(
        &self,
        events: Vec<UncommittedEvent>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEvent>, EventStoreError> {
        (**self).append(events, expected_version)
    }

    fn load_stream(&self, ledger_id: LedgerId) -> Result<Vec<StoredEvent>, EventStoreError> {
        (**self).load_stream(ledger_id)
    }
}

impl UncommittedEvent {
    /// Serialize a typed domain event, capturing its metadata.
    pub fn from_typed<E>(ledger_id: LedgerId, event_id: Uuid, event: &E) -> Result<Self, EventStoreError>
    where
        E: fizzy_events::Event + Serialize,
    {
        let payload = serde_json::to_value(event)
            .map_err(|e| EventStoreError::Serialization(format!("payload: {e}")))?;

        Ok(Self {
            event_id,
            ledger_id,
            event_type: event.event_type().to_string(),
            event_version: event.version(),
            occurred_at: event.occurred_at(),
            payload,
        })
    }
}
