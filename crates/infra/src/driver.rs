//! Line-oriented JSON protocol for the `fizzy-ledger` binary.
//!
//! One request object per input line, one response object per output line:
//!
//! ```text
//! {"op":"mint","caller":"<uuid>","to":"<uuid>","amount":"1000"}
//! {"status":"committed","events":[...]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use fizzy_core::{AccountId, Amount};
use fizzy_events::{EventBus, EventEnvelope};

use crate::journal::{EventStore, StoredEvent};
use crate::service::{LedgerService, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Mint {
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Burn {
        caller: AccountId,
        amount: Amount,
    },
    Transfer {
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    },
    TransferFrom {
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Approve {
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    },
    BalanceOf {
        account: AccountId,
    },
    Allowance {
        owner: AccountId,
        spender: AccountId,
    },
    TotalSupply,
    Metadata,
    ExplainMint {
        account: AccountId,
    },
    History,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Committed { events: Vec<StoredEvent> },
    Value { value: JsonValue },
    Error { kind: &'static str, message: String },
}

impl Response {
    fn error(kind: &'static str, message: impl ToString) -> Self {
        Response::Error {
            kind,
            message: message.to_string(),
        }
    }
}

impl From<ServiceError> for Response {
    fn from(err: ServiceError) -> Self {
        let kind = match &err {
            ServiceError::Ledger(ledger) => ledger.kind(),
            ServiceError::Store(_) => "journal",
            ServiceError::Publish(_) => "publish",
            ServiceError::Poisoned => "poisoned",
            ServiceError::Deserialize(_) => "deserialize",
        };
        Response::error(kind, err)
    }
}

/// Parse and run one input line. Never fails: errors become error responses.
pub fn handle_line<S, B>(service: &LedgerService<S, B>, line: &str) -> Response
where
    S: EventStore,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(service, request).unwrap_or_else(Response::from),
        Err(err) => Response::error("bad_request", err),
    }
}

pub fn dispatch<S, B>(service: &LedgerService<S, B>, request: Request) -> Result<Response, ServiceError>
where
    S: EventStore,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    match request {
        Request::Mint { caller, to, amount } => committed(service.mint(caller, to, amount)?),
        Request::Burn { caller, amount } => committed(service.burn(caller, amount)?),
        Request::Transfer { caller, to, amount } => committed(service.transfer(caller, to, amount)?),
        Request::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => committed(service.transfer_from(caller, from, to, amount)?),
        Request::Approve {
            caller,
            spender,
            amount,
        } => committed(service.approve(caller, spender, amount)?),
        Request::BalanceOf { account } => value(service.balance_of(account)?),
        Request::Allowance { owner, spender } => value(service.allowance(owner, spender)?),
        Request::TotalSupply => value(service.total_supply()?),
        Request::Metadata => value(service.metadata()?),
        Request::ExplainMint { account } => value(service.explain_mint(account)?),
        Request::History => value(service.history()?),
    }
}

fn committed(events: Vec<StoredEvent>) -> Result<Response, ServiceError> {
    Ok(Response::Committed { events })
}

fn value(v: impl Serialize) -> Result<Response, ServiceError> {
    serde_json::to_value(v)
        .map(|value| Response::Value { value })
        .map_err(|e| ServiceError::Deserialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use fizzy_events::InMemoryEventBus;

    use super::*;
    use crate::config::LedgerConfig;
    use crate::journal::InMemoryEventStore;

    fn service(executor: AccountId) -> LedgerService<InMemoryEventStore, Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>> {
        LedgerService::new(
            &LedgerConfig::new(executor),
            InMemoryEventStore::new(),
            Arc::new(InMemoryEventBus::new()),
        )
        .unwrap()
    }

    fn line(v: JsonValue) -> String {
        v.to_string()
    }

    #[test]
    fn mint_then_query_balance() {
        let executor = AccountId::new();
        let alice = AccountId::new();
        let svc = service(executor);

        let minted = handle_line(
            &svc,
            &line(json!({"op": "mint", "caller": executor, "to": alice, "amount": "1000"})),
        );
        assert!(matches!(&minted, Response::Committed { events } if events.len() == 1));

        let balance = handle_line(&svc, &line(json!({"op": "balance_of", "account": alice})));
        assert_eq!(balance, Response::Value { value: json!("1000") });

        let supply = handle_line(&svc, &line(json!({"op": "total_supply"})));
        assert_eq!(supply, Response::Value { value: json!("1000") });
    }

    #[test]
    fn ledger_errors_carry_a_stable_kind() {
        let executor = AccountId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let svc = service(executor);

        let denied = handle_line(
            &svc,
            &line(json!({"op": "mint", "caller": alice, "to": alice, "amount": "1"})),
        );
        assert!(matches!(denied, Response::Error { kind: "unauthorized", .. }));

        let no_allowance = handle_line(
            &svc,
            &line(json!({"op": "transfer_from", "caller": bob, "from": alice, "to": bob, "amount": "1"})),
        );
        assert!(matches!(no_allowance, Response::Error { kind: "insufficient_allowance", .. }));
    }

    #[test]
    fn allowance_flow_round_trips_through_the_protocol() {
        let executor = AccountId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let svc = service(executor);

        handle_line(&svc, &line(json!({"op": "mint", "caller": executor, "to": alice, "amount": "500"})));

        let approved = handle_line(
            &svc,
            &line(json!({"op": "approve", "caller": alice, "spender": bob, "amount": "100"})),
        );
        assert!(matches!(&approved, Response::Committed { events } if events.len() == 1));

        let Response::Committed { events } = handle_line(
            &svc,
            &line(json!({"op": "transfer_from", "caller": bob, "from": alice, "to": bob, "amount": "60"})),
        ) else {
            panic!("expected a committed response");
        };
        let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, ["token.approval", "token.transfer"]);
        assert_eq!(events[0].payload.pointer("/Approval/amount"), Some(&json!("40")));

        let moved = handle_line(&svc, &line(json!({"op": "transfer", "caller": bob, "to": alice, "amount": "10"})));
        assert!(matches!(&moved, Response::Committed { events } if events.len() == 1));

        let burned = handle_line(&svc, &line(json!({"op": "burn", "caller": bob, "amount": "50"})));
        assert!(matches!(&burned, Response::Committed { events } if events[0].sequence_number == 6));

        let remaining = handle_line(&svc, &line(json!({"op": "allowance", "owner": alice, "spender": bob})));
        assert_eq!(remaining, Response::Value { value: json!("40") });

        let supply = handle_line(&svc, &line(json!({"op": "total_supply"})));
        assert_eq!(supply, Response::Value { value: json!("450") });

        let Response::Value { value } = handle_line(&svc, &line(json!({"op": "history"}))) else {
            panic!("expected a value response");
        };
        let history = value.as_array().unwrap();
        let sequence: Vec<_> = history.iter().map(|e| e["sequence_number"].as_u64().unwrap()).collect();
        assert_eq!(sequence, [1, 2, 3, 4, 5, 6]);
        assert_eq!(history[1]["event_type"], "token.approval");
        assert_eq!(history[5]["event_type"], "token.transfer");
        assert_eq!(history[5]["payload"]["Transfer"]["amount"], "50");

        let Response::Value { value } = handle_line(&svc, &line(json!({"op": "explain_mint", "account": executor}))) else {
            panic!("expected a value response");
        };
        assert_eq!(value["granted"], true);
    }

    #[test]
    fn malformed_lines_are_bad_requests() {
        let svc = service(AccountId::new());

        for input in ["not json", r#"{"op":"teleport"}"#, r#"{"op":"burn","caller":"x","amount":"1"}"#] {
            assert!(matches!(handle_line(&svc, input), Response::Error { kind: "bad_request", .. }));
        }
    }

    #[test]
    fn metadata_serializes_flat() {
        let svc = service(AccountId::new());

        let Response::Value { value } = handle_line(&svc, r#"{"op":"metadata"}"#) else {
            panic!("expected a value response");
        };
        assert_eq!(value["symbol"], "FMT");
        assert_eq!(value["decimals"], 18);
    }
}
