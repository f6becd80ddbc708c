//! Fungible token ledger (event-sourced).
//!
//! Pure domain logic only: no IO, no locking, no persistence concerns.

pub mod command;
pub mod event;
pub mod ledger;
pub mod metadata;

pub use command::{Approve, Burn, Mint, TokenCommand, Transfer, TransferFrom};
pub use event::{Approved, TokenEvent, Transferred};
pub use ledger::Token;
pub use metadata::TokenMetadata;
