//! Balance aggregation over a transaction collection

use crate::core::model::{EntryType, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// Sums income and expense amounts. Always recomputed from the full collection.
pub fn aggregate(transactions: &[Transaction]) -> BalanceSummary {
    let total_for = |entry_type: EntryType| -> f64 {
        transactions
            .iter()
            .filter(|t| t.entry_type == entry_type)
            .map(|t| t.amount)
            .sum()
    };

    let total_income = total_for(EntryType::Income);
    let total_expense = total_for(EntryType::Expense);

    BalanceSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }
}
