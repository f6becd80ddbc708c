//! Read models built from ledger notifications.
//!
//! Read models are rebuildable from the journal and only ever see committed
//! events. Feed them through [`fizzy_events::ProjectionRunner`] so duplicates,
//! gaps and foreign ledgers are rejected.

pub mod balances;

use serde_json::Value as JsonValue;

use fizzy_events::EventEnvelope;
use fizzy_token::TokenEvent;

pub use balances::BalanceProjection;

/// Decode a bus envelope into a typed ledger envelope.
pub fn decode_envelope(
    envelope: EventEnvelope<JsonValue>,
) -> Result<EventEnvelope<TokenEvent>, serde_json::Error> {
    envelope.try_map_payload(serde_json::from_value)
}
