//! Command handlers acting as the caller of the ledger and quote layers.
//!
//! Input validation lives here, not in the repositories.

pub mod balance;
pub mod categories;
pub mod quote;
pub mod setup;
pub mod transactions;
pub mod ui;
