use super::{balance, ui};
use crate::core::balance::aggregate;
use crate::core::model::{Category, EntryType, Transaction};
use crate::ledger::{CategoryRepository, TransactionRepository};
use anyhow::{Result, bail};
use comfy_table::Cell;
use tracing::debug;

/// Input for a new transaction, as entered by the user.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub entry_type: EntryType,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub image_uri: Option<String>,
}

/// Fields to change on an existing transaction. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub id: String,
    pub entry_type: Option<EntryType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub image_uri: Option<String>,
}

fn validate_amount(amount: Option<f64>) -> Result<f64> {
    let Some(amount) = amount else {
        bail!("Please enter an amount");
    };
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be a positive number, got {amount}");
    }
    Ok(amount)
}

/// Finds a category of `entry_type` by id, or by name ignoring case.
pub fn resolve_category<'a>(
    categories: &'a [Category],
    key: &str,
    entry_type: EntryType,
) -> Result<&'a Category> {
    let found = categories
        .iter()
        .find(|c| c.id == key)
        .or_else(|| {
            categories
                .iter()
                .find(|c| c.entry_type == entry_type && c.name.eq_ignore_ascii_case(key))
        });

    match found {
        Some(category) if category.entry_type == entry_type => Ok(category),
        Some(category) => bail!(
            "Category {} is for {} entries, not {}",
            category.name,
            category.entry_type,
            entry_type
        ),
        None => bail!("No {entry_type} category matches: {key}"),
    }
}

pub async fn add(
    transactions: &TransactionRepository,
    categories: &CategoryRepository,
    input: NewTransaction,
) -> Result<Transaction> {
    let amount = validate_amount(input.amount)?;
    let Some(category_key) = input.category.as_deref() else {
        bail!("Please select a category");
    };
    let all_categories = categories.list().await;
    let category = resolve_category(&all_categories, category_key, input.entry_type)?;

    let mut transaction = Transaction::new(
        input.entry_type,
        amount,
        input.note.as_deref().unwrap_or_default(),
    )
    .with_category(&category.id);
    if let Some(image_uri) = input.image_uri.as_deref() {
        transaction = transaction.with_image(image_uri);
    }

    transactions.create(transaction.clone()).await?;
    debug!(id = %transaction.id, "Created transaction");
    Ok(transaction)
}

/// Applies an edit. The id and creation date are never changed.
pub async fn edit(
    transactions: &TransactionRepository,
    categories: &CategoryRepository,
    edit: TransactionEdit,
) -> Result<Transaction> {
    let Some(mut transaction) = transactions.find(&edit.id).await else {
        bail!("No transaction with id: {}", edit.id);
    };

    if let Some(entry_type) = edit.entry_type {
        transaction.entry_type = entry_type;
    }
    if edit.amount.is_some() {
        transaction.amount = validate_amount(edit.amount)?;
    }
    if let Some(note) = edit.note {
        transaction.note = note;
    }
    if let Some(image_uri) = edit.image_uri {
        transaction.image_uri = (!image_uri.is_empty()).then_some(image_uri);
    }

    let all_categories = categories.list().await;
    let category_key = edit.category.or_else(|| transaction.category_id.clone());
    match category_key {
        Some(key) => {
            let category = resolve_category(&all_categories, &key, transaction.entry_type)?;
            transaction.category_id = Some(category.id.clone());
        }
        None => bail!("Please select a category"),
    }

    transactions.update(transaction.clone()).await?;
    Ok(transaction)
}

pub async fn delete(transactions: &TransactionRepository, id: &str) -> Result<()> {
    if transactions.find(id).await.is_none() {
        bail!("No transaction with id: {id}");
    }
    transactions.delete(id).await
}

/// Renders transactions newest first, tolerating deleted categories.
pub fn render_table(transactions: &[Transaction], categories: &[Category]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Icon"),
        ui::header_cell("Category"),
        ui::header_cell("Note"),
        ui::header_cell("Amount"),
        ui::header_cell("Id"),
    ]);

    for transaction in transactions {
        let category = transaction.category(categories);
        table.add_row(vec![
            Cell::new(transaction.date.format("%Y-%m-%d").to_string()),
            Cell::new(transaction.display_icon(category)),
            Cell::new(transaction.display_label(category)),
            Cell::new(&transaction.note),
            ui::amount_cell(transaction.amount, transaction.entry_type),
            Cell::new(ui::style_text(&transaction.id, ui::StyleType::Subtle)),
        ]);
    }

    table.to_string()
}

pub async fn list(transactions: &TransactionRepository, categories: &CategoryRepository) {
    let all = transactions.list().await;
    if all.is_empty() {
        println!("{}", ui::style_text("No transactions yet", ui::StyleType::Subtle));
        return;
    }

    let all_categories = categories.list().await;
    println!(
        "{}\n\n{}",
        ui::style_text("My Wallet", ui::StyleType::Title),
        render_table(&all, &all_categories)
    );
    ui::print_separator();
    println!("{}", balance::render_summary(&aggregate(&all)));
}
