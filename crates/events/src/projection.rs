use crate::{Event, EventEnvelope};

/// A projection builds a read model from the ledger's notification stream.
///
/// Read models are disposable: they can be dropped and rebuilt by replaying
/// the journal. Use [`crate::ProjectionRunner`] to enforce ledger pinning and
/// gapless sequence numbers: duplicates are rejected harmlessly and a lost
/// delivery is reported instead of silently skipped.
///
/// `apply` does not return errors: an event that is irrelevant to the read
/// model is ignored.
pub trait Projection {
    type Ev: Event;

    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);
}
