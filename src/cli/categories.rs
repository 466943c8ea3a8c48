use super::ui;
use crate::core::model::{Category, EntryType, Icon};
use crate::ledger::CategoryRepository;
use anyhow::{Result, bail};
use comfy_table::Cell;

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub entry_type: EntryType,
    pub icon: Option<Icon>,
}

/// Fields to change on an existing category. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CategoryEdit {
    pub id: String,
    pub name: Option<String>,
    pub entry_type: Option<EntryType>,
    pub icon: Option<Icon>,
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Please enter a name");
    }
    Ok(name)
}

pub async fn add(categories: &CategoryRepository, input: NewCategory) -> Result<Category> {
    let name = validate_name(&input.name)?;
    let category = Category::new(name, input.icon.unwrap_or_default(), input.entry_type);
    categories.save(category.clone()).await?;
    Ok(category)
}

/// Edits a category in place. Its id and default flag are kept.
pub async fn edit(categories: &CategoryRepository, edit: CategoryEdit) -> Result<Category> {
    let Some(mut category) = categories.find(&edit.id).await else {
        bail!("No category with id: {}", edit.id);
    };

    if let Some(name) = edit.name.as_deref() {
        category.name = validate_name(name)?.to_string();
    }
    if let Some(entry_type) = edit.entry_type {
        category.entry_type = entry_type;
    }
    if let Some(icon) = edit.icon {
        category.icon = icon;
    }

    categories.save(category.clone()).await?;
    Ok(category)
}

/// Deletes a user-defined category. Built-in categories are refused.
pub async fn delete(categories: &CategoryRepository, id: &str) -> Result<()> {
    let Some(category) = categories.find(id).await else {
        bail!("No category with id: {id}");
    };
    if !category.is_deletable() {
        bail!("Default category {} cannot be deleted", category.name);
    }
    categories.delete(id).await
}

pub fn render_table(categories: &[Category]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Icon"),
        ui::header_cell("Type"),
        ui::header_cell("Default"),
    ]);

    for category in categories {
        table.add_row(vec![
            Cell::new(&category.id),
            Cell::new(&category.name),
            Cell::new(category.icon),
            Cell::new(category.entry_type),
            Cell::new(if category.is_default { "yes" } else { "" }),
        ]);
    }

    table.to_string()
}

pub async fn list(categories: &CategoryRepository) {
    println!("{}", render_table(&categories.list().await));
}
