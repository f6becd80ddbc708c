use std::io::{self, BufRead, Write};

use anyhow::Context;
use serde_json::Value as JsonValue;
use tracing::info;

use fizzy_events::{EventEnvelope, InMemoryEventBus};
use fizzy_infra::config::LedgerConfig;
use fizzy_infra::driver;
use fizzy_infra::journal::InMemoryEventStore;
use fizzy_infra::service::LedgerService;

fn main() -> anyhow::Result<()> {
    let config = LedgerConfig::from_env().context("failed to load ledger configuration")?;
    fizzy_observability::init_with(config.log_format, "info");

    let bus: InMemoryEventBus<EventEnvelope<JsonValue>> = InMemoryEventBus::new();
    let service = LedgerService::new(&config, InMemoryEventStore::new(), bus)?;

    info!(
        ledger_id = %config.ledger_id,
        executor = %config.executor,
        symbol = %config.metadata.symbol,
        decimals = config.metadata.decimals,
        "ledger ready; reading requests from stdin"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut handled = 0u64;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = driver::handle_line(&service, &line);
        serde_json::to_writer(&mut stdout, &response).context("failed to encode response")?;
        writeln!(stdout)?;
        stdout.flush()?;
        handled += 1;
    }

    info!(
        requests = handled,
        total_supply = %service.total_supply()?,
        "input closed; shutting down"
    );
    Ok(())
}
