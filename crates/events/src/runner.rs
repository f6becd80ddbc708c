//! Projection runner (read model builder).
//!
//! Feeds envelopes to a projection in journal order and tracks how far it got.
//! No storage assumptions.

use fizzy_core::LedgerId;

use crate::{EventEnvelope, Projection};

/// Tracks projection progress for a single ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProjectionCursor {
    ledger_id: LedgerId,
    last_sequence_number: u64,
}

impl ProjectionCursor {
    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    pub fn last_sequence_number(&self) -> u64 {
        self.last_sequence_number
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    LedgerMismatch { expected: LedgerId, found: LedgerId },
    NonMonotonicSequence { last: u64, found: u64 },
    /// One or more envelopes between `last` and `found` were never seen.
    Gap { last: u64, found: u64 },
}

/// Runs envelopes through a projection and tracks progress.
#[derive(Debug)]
pub struct ProjectionRunner<P>
where
    P: Projection,
{
    projection: P,
    cursor: Option<ProjectionCursor>,
}

impl<P> ProjectionRunner<P>
where
    P: Projection,
{
    pub fn new(projection: P) -> Self {
        Self {
            projection,
            cursor: None,
        }
    }

    /// Create a runner pinned to a specific ledger, so the first envelope
    /// cannot silently bind it to the wrong stream.
    pub fn new_for_ledger(ledger_id: LedgerId, projection: P) -> Self {
        Self {
            projection,
            cursor: Some(ProjectionCursor {
                ledger_id,
                last_sequence_number: 0,
            }),
        }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn into_projection(self) -> P {
        self.projection
    }

    pub fn cursor(&self) -> Option<ProjectionCursor> {
        self.cursor
    }

    /// Apply a single envelope, enforcing ledger consistency and gapless sequencing.
    ///
    /// The next envelope must carry exactly `last + 1`. A rejected envelope
    /// leaves the projection and cursor untouched; the caller recovers by
    /// rebuilding from the journal.
    pub fn apply(&mut self, envelope: &EventEnvelope<P::Ev>) -> Result<(), ProjectionError> {
        let found_ledger = envelope.ledger_id();
        let found_seq = envelope.sequence_number();

        let mut cursor = match self.cursor {
            None => ProjectionCursor {
                ledger_id: found_ledger,
                last_sequence_number: 0,
            },
            Some(c) => c,
        };

        if cursor.ledger_id != found_ledger {
            return Err(ProjectionError::LedgerMismatch {
                expected: cursor.ledger_id,
                found: found_ledger,
            });
        }
        if found_seq <= cursor.last_sequence_number {
            return Err(ProjectionError::NonMonotonicSequence {
                last: cursor.last_sequence_number,
                found: found_seq,
            });
        }
        if found_seq != cursor.last_sequence_number + 1 {
            return Err(ProjectionError::Gap {
                last: cursor.last_sequence_number,
                found: found_seq,
            });
        }

        self.projection.apply(envelope);
        cursor.last_sequence_number = found_seq;
        self.cursor = Some(cursor);
        Ok(())
    }

    /// Apply many envelopes in order.
    pub fn run<'a>(
        &mut self,
        envelopes: impl IntoIterator<Item = &'a EventEnvelope<P::Ev>>,
    ) -> Result<(), ProjectionError>
    where
        P::Ev: 'a,
    {
        for env in envelopes {
            self.apply(env)?;
        }
        Ok(())
    }

    /// Rebuild a projection from scratch by replaying the full history.
    pub fn rebuild_from_scratch<'a>(
        factory: impl FnOnce() -> P,
        envelopes: impl IntoIterator<Item = &'a EventEnvelope<P::Ev>>,
    ) -> Result<(P, Option<ProjectionCursor>), ProjectionError>
    where
        P::Ev: 'a,
    {
        let mut runner = ProjectionRunner::new(factory());
        runner.run(envelopes)?;
        Ok((runner.projection, runner.cursor))
    }
}
