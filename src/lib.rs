pub mod cli;
pub mod core;
pub mod ledger;
pub mod providers;
pub mod store;

use crate::cli::categories::{CategoryEdit, NewCategory};
use crate::cli::transactions::{NewTransaction, TransactionEdit};
use crate::core::config::AppConfig;
use crate::core::quote::{ChartInterval, ChartRange};
use crate::core::store::Store;
use crate::ledger::{CategoryRepository, TransactionRepository};
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    List,
    Balance,
    Add(NewTransaction),
    Edit(TransactionEdit),
    Delete {
        id: String,
    },
    Categories,
    AddCategory(NewCategory),
    EditCategory(CategoryEdit),
    DeleteCategory {
        id: String,
    },
    Quote {
        symbols: Vec<String>,
        range: Option<ChartRange>,
        interval: Option<ChartInterval>,
    },
    Reset {
        confirmed: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Wallet Watch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    if let AppCommand::Quote {
        symbols,
        range,
        interval,
    } = command
    {
        let provider = providers::YahooChartProvider::new(&config.yahoo_base_url());
        let report = cli::quote::run(
            &provider,
            &symbols,
            range.unwrap_or(config.quote.range),
            interval.unwrap_or(config.quote.interval),
        )
        .await;
        println!("{report}");
        return Ok(());
    }

    let store = store::open_default(&config)?;
    run_ledger_command(command, store).await
}

/// Runs a transaction or category command against the given store.
pub async fn run_ledger_command(command: AppCommand, store: Arc<dyn Store>) -> Result<()> {
    let transactions = TransactionRepository::new(Arc::clone(&store));
    let categories = CategoryRepository::new(store);

    match command {
        AppCommand::List => cli::transactions::list(&transactions, &categories).await,
        AppCommand::Balance => cli::balance::run(&transactions).await,
        AppCommand::Add(input) => {
            let created = cli::transactions::add(&transactions, &categories, input).await?;
            println!("Added transaction {}", created.id);
        }
        AppCommand::Edit(edit) => {
            let updated = cli::transactions::edit(&transactions, &categories, edit).await?;
            println!("Updated transaction {}", updated.id);
        }
        AppCommand::Delete { id } => {
            cli::transactions::delete(&transactions, &id).await?;
            println!("Deleted transaction {id}");
        }
        AppCommand::Categories => cli::categories::list(&categories).await,
        AppCommand::AddCategory(input) => {
            let created = cli::categories::add(&categories, input).await?;
            println!("Added category {} ({})", created.name, created.id);
        }
        AppCommand::EditCategory(edit) => {
            let updated = cli::categories::edit(&categories, edit).await?;
            println!("Updated category {} ({})", updated.name, updated.id);
        }
        AppCommand::DeleteCategory { id } => {
            cli::categories::delete(&categories, &id).await?;
            println!("Deleted category {id}");
        }
        AppCommand::Reset { confirmed } => {
            if !confirmed {
                bail!("Refusing to erase all data without --yes");
            }
            transactions.clear().await?;
            categories.clear().await?;
            println!("All transactions and categories removed");
        }
        AppCommand::Quote { .. } => bail!("Quote command does not use the ledger"),
    }

    Ok(())
}
