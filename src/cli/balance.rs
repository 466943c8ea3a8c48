use super::ui;
use crate::core::balance::{BalanceSummary, aggregate};
use crate::ledger::TransactionRepository;

pub fn render_summary(summary: &BalanceSummary) -> String {
    let balance_style = if summary.balance >= 0.0 {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };

    format!(
        "{} {}\n{} +{:.2}\n{} -{:.2}",
        ui::style_text("Total Balance:", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.2}", summary.balance), balance_style),
        ui::style_text("Income:", ui::StyleType::TotalLabel),
        summary.total_income,
        ui::style_text("Expense:", ui::StyleType::TotalLabel),
        summary.total_expense,
    )
}

pub async fn run(transactions: &TransactionRepository) {
    let summary = aggregate(&transactions.list().await);
    println!("{}", render_summary(&summary));
}
