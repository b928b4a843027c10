//! jadepay deal management
//!
//! Wraps the pure settlement functions of `jadepay-engine` in a per-deal
//! ledger with blood-battle bookkeeping, plus a seeded batch simulator for
//! auditing and benchmarking.

pub mod ledger;
pub mod simulator;

pub use ledger::{DealLedger, DealOutcome, SettlementRecord};
