/// Execute an aggregate command in place (no IO, no journal, no bus).
///
/// 1. **Decide**: `aggregate.handle(command)` produces events without mutating.
/// 2. **Evolve**: each event is applied in order.
///
/// If `handle` fails nothing is applied, so a rejected command leaves the
/// aggregate untouched. `LedgerService` wraps the same two steps with a
/// journal append and bus publication.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: fizzy_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
