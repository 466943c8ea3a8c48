//! Ledger records and their serialized shape

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntryType::Income => "income",
                EntryType::Expense => "expense",
            }
        )
    }
}

impl FromStr for EntryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            _ => Err(anyhow!("Invalid entry type: {}", s)),
        }
    }
}

/// Icon identifiers understood by the front ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Icon {
    Food,
    Bus,
    Cart,
    Movie,
    Heart,
    Cash,
    Briefcase,
    School,
    Gift,
    Gamepad,
    Home,
    Airplane,
    Car,
    Bank,
    Hospital,
    Book,
    #[default]
    HelpCircle,
}

impl Icon {
    pub const ALL: [Icon; 17] = [
        Icon::Food,
        Icon::Bus,
        Icon::Cart,
        Icon::Movie,
        Icon::Heart,
        Icon::Cash,
        Icon::Briefcase,
        Icon::School,
        Icon::Gift,
        Icon::Gamepad,
        Icon::Home,
        Icon::Airplane,
        Icon::Car,
        Icon::Bank,
        Icon::Hospital,
        Icon::Book,
        Icon::HelpCircle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Food => "food",
            Icon::Bus => "bus",
            Icon::Cart => "cart",
            Icon::Movie => "movie",
            Icon::Heart => "heart",
            Icon::Cash => "cash",
            Icon::Briefcase => "briefcase",
            Icon::School => "school",
            Icon::Gift => "gift",
            Icon::Gamepad => "gamepad",
            Icon::Home => "home",
            Icon::Airplane => "airplane",
            Icon::Car => "car",
            Icon::Bank => "bank",
            Icon::Hospital => "hospital",
            Icon::Book => "book",
            Icon::HelpCircle => "help-circle",
        }
    }

    /// Icon shown for a transaction without a resolvable category.
    pub fn fallback_for(entry_type: EntryType) -> Icon {
        match entry_type {
            EntryType::Income => Icon::Cash,
            EntryType::Expense => Icon::Cart,
        }
    }
}

impl Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Icon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        Icon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == name)
            .ok_or_else(|| anyhow!("Unknown icon: {}", s))
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        icon.as_str().to_string()
    }
}

// Stored records are read leniently; only user input goes through `FromStr`.
impl From<String> for Icon {
    fn from(name: String) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(icon = %name, "Unknown icon in stored category, using default");
            Icon::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: Icon,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub is_default: bool,
}

impl Category {
    /// Creates a user-defined category with a fresh id.
    pub fn new(name: &str, icon: Icon, entry_type: EntryType) -> Self {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            icon,
            entry_type,
            is_default: false,
        }
    }

    fn builtin(id: &str, name: &str, icon: Icon, entry_type: EntryType) -> Self {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon,
            entry_type,
            is_default: true,
        }
    }

    /// Built-in categories served until the collection is first written.
    pub fn defaults() -> Vec<Category> {
        vec![
            Category::builtin("1", "Salary", Icon::Cash, EntryType::Income),
            Category::builtin("2", "Business", Icon::Briefcase, EntryType::Income),
            Category::builtin("3", "Food", Icon::Food, EntryType::Expense),
            Category::builtin("4", "Transport", Icon::Bus, EntryType::Expense),
            Category::builtin("5", "Shopping", Icon::Cart, EntryType::Expense),
            Category::builtin("6", "Entertainment", Icon::Movie, EntryType::Expense),
            Category::builtin("7", "Health", Icon::Heart, EntryType::Expense),
        ]
    }

    pub fn is_deletable(&self) -> bool {
        !self.is_default
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Creates a transaction dated now with a fresh id.
    pub fn new(entry_type: EntryType, amount: f64, note: &str) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            entry_type,
            amount,
            note: note.to_string(),
            category_id: None,
            image_uri: None,
            date: Utc::now(),
        }
    }

    pub fn with_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }

    pub fn with_image(mut self, image_uri: &str) -> Self {
        self.image_uri = Some(image_uri.to_string());
        self
    }

    /// Resolves the referenced category, if it still exists.
    pub fn category<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        let id = self.category_id.as_deref()?;
        categories.iter().find(|c| c.id == id)
    }

    /// Category name, else the note, else the entry type.
    pub fn display_label(&self, category: Option<&Category>) -> String {
        if let Some(category) = category {
            return category.name.clone();
        }
        if !self.note.is_empty() {
            return self.note.clone();
        }
        match self.entry_type {
            EntryType::Income => "Income".to_string(),
            EntryType::Expense => "Expense".to_string(),
        }
    }

    pub fn display_icon(&self, category: Option<&Category>) -> Icon {
        category.map_or_else(|| Icon::fallback_for(self.entry_type), |c| c.icon)
    }
}
