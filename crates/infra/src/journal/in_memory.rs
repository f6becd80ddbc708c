use std::collections::HashMap;
use std::sync::RwLock;

use fizzy_core::{ExpectedVersion, LedgerId};

use super::store::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};

/// In-memory append-only journal.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<LedgerId, Vec<StoredEvent>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(stream: &[StoredEvent]) -> u64 {
        stream.last().map(|e| e.sequence_number).unwrap_or(0)
    }
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        events: Vec<UncommittedEvent>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEvent>, EventStoreError> {
        let Some(first) = events.first() else {
            return Ok(vec![]);
        };
        let ledger_id = first.ledger_id;

        if let Some(idx) = events.iter().position(|e| e.ledger_id != ledger_id) {
            return Err(EventStoreError::LedgerMismatch(format!(
                "batch contains multiple ledger ids (index {idx})"
            )));
        }

        let mut streams = self.streams.write().map_err(|_| EventStoreError::Poisoned)?;

        let stream = streams.entry(ledger_id).or_default();
        let current = Self::current_version(stream);

        if !expected_version.matches(current) {
            return Err(EventStoreError::Concurrency(format!(
                "expected {expected_version:?}, found {current}"
            )));
        }

        let committed: Vec<StoredEvent> = events
            .into_iter()
            .zip(current + 1..)
            .map(|(e, sequence_number)| StoredEvent {
                event_id: e.event_id,
                ledger_id: e.ledger_id,
                sequence_number,
                event_type: e.event_type,
                event_version: e.event_version,
                occurred_at: e.occurred_at,
                payload: e.payload,
            })
            .collect();

        stream.extend(committed.iter().cloned());

        Ok(committed)
    }

    fn load_stream(&self, ledger_id: LedgerId) -> Result<Vec<StoredEvent>, EventStoreError> {
        let streams = self.streams.read().map_err(|_| EventStoreError::Poisoned)?;

        Ok(streams.get(&ledger_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn uncommitted(ledger_id: LedgerId, n: u64) -> UncommittedEvent {
        UncommittedEvent {
            event_id: Uuid::now_v7(),
            ledger_id,
            event_type: "token.transfer".to_string(),
            event_version: 1,
            occurred_at: Utc::now(),
            payload: json!({ "n": n }),
        }
    }

    #[test]
    fn assigns_consecutive_sequence_numbers() {
        let store = InMemoryEventStore::new();
        let ledger_id = LedgerId::new();

        let first = store
            .append(vec![uncommitted(ledger_id, 1), uncommitted(ledger_id, 2)], ExpectedVersion::Exact(0))
            .unwrap();
        let second = store
            .append(vec![uncommitted(ledger_id, 3)], ExpectedVersion::Exact(2))
            .unwrap();

        assert_eq!(
            first.iter().chain(&second).map(|e| e.sequence_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(store.load_stream(ledger_id).unwrap().len(), 3);
    }

    #[test]
    fn stale_expected_version_appends_nothing() {
        let store = InMemoryEventStore::new();
        let ledger_id = LedgerId::new();
        store.append(vec![uncommitted(ledger_id, 1)], ExpectedVersion::Exact(0)).unwrap();

        let err = store
            .append(vec![uncommitted(ledger_id, 2)], ExpectedVersion::Exact(0))
            .unwrap_err();

        assert!(matches!(err, EventStoreError::Concurrency(_)));
        assert_eq!(store.load_stream(ledger_id).unwrap().len(), 1);
    }

    #[test]
    fn mixed_ledger_batches_are_rejected() {
        let store = InMemoryEventStore::new();
        let a = LedgerId::new();
        let b = LedgerId::new();

        let err = store
            .append(vec![uncommitted(a, 1), uncommitted(b, 2)], ExpectedVersion::Any)
            .unwrap_err();

        assert!(matches!(err, EventStoreError::LedgerMismatch(_)));
        assert!(store.load_stream(a).unwrap().is_empty());
        assert!(store.load_stream(b).unwrap().is_empty());
    }
}
