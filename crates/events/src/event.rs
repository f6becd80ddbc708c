use chrono::{DateTime, Utc};

/// A ledger notification.
///
/// Events are facts: immutable, versioned, append-only. They are the only
/// externally observable side channel of the ledger besides return values.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "token.transfer").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the operation that produced the event was submitted.
    fn occurred_at(&self) -> DateTime<Utc>;
}
