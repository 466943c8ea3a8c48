//! Core business logic abstractions

pub mod balance;
pub mod config;
pub mod log;
pub mod model;
pub mod quote;
pub mod store;

// Re-export main types for cleaner imports
pub use balance::{BalanceSummary, aggregate};
pub use model::{Category, EntryType, Icon, Transaction};
pub use quote::{ChartData, ChartInterval, ChartRange, QuoteProvider, StockDataPoint, StockMeta};
pub use store::Store;
