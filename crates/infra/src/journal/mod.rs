//! Append-only journal of committed ledger events.
//!
//! The journal is the source of truth for replay; the bus only fans events out.

pub mod in_memory;
pub mod store;

pub use in_memory::InMemoryEventStore;
pub use store::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};
