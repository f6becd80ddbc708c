//! `fizzy-core`: ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod amount;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use amount::{Amount, ParseAmountError, checked_sum};
pub use error::{LedgerError, LedgerResult};
pub use id::{AccountId, LedgerId};
