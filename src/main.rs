use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use walletwatch::AppCommand;
use walletwatch::cli::categories::{CategoryEdit, NewCategory};
use walletwatch::cli::transactions::{NewTransaction, TransactionEdit};
use walletwatch::core::log::init_logging;
use walletwatch::core::model::{EntryType, Icon};
use walletwatch::core::quote::{ChartInterval, ChartRange};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List transactions, newest first
    List,
    /// Show total income, expense and balance
    Balance,
    /// Record a new income or expense
    Add {
        /// income or expense
        #[arg(short = 't', long = "type")]
        entry_type: EntryType,
        #[arg(short, long)]
        amount: Option<f64>,
        /// Category id or name
        #[arg(short = 'g', long)]
        category: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// Path or URI of a receipt image
        #[arg(long)]
        image: Option<String>,
    },
    /// Change an existing transaction
    Edit {
        id: String,
        #[arg(short = 't', long = "type")]
        entry_type: Option<EntryType>,
        #[arg(short, long)]
        amount: Option<f64>,
        #[arg(short = 'g', long)]
        category: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// New image URI, or an empty string to drop it
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a transaction
    Delete { id: String },
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommands),
    /// Display stock quotes
    Quote {
        #[arg(required = true)]
        symbols: Vec<String>,
        /// Chart range, e.g. 1d, 5d, 1mo, 1y
        #[arg(short, long)]
        range: Option<ChartRange>,
        /// Chart interval, e.g. 5m, 1h, 1d
        #[arg(short, long)]
        interval: Option<ChartInterval>,
    },
    /// Erase all transactions and categories
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,
    /// Create a category
    Add {
        name: String,
        #[arg(short = 't', long = "type")]
        entry_type: EntryType,
        #[arg(short, long)]
        icon: Option<Icon>,
    },
    /// Rename or restyle a category
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 't', long = "type")]
        entry_type: Option<EntryType>,
        #[arg(short, long)]
        icon: Option<Icon>,
    },
    /// Delete a user-defined category
    Delete { id: String },
}

impl From<CategoryCommands> for AppCommand {
    fn from(cmd: CategoryCommands) -> AppCommand {
        match cmd {
            CategoryCommands::List => AppCommand::Categories,
            CategoryCommands::Add {
                name,
                entry_type,
                icon,
            } => AppCommand::AddCategory(NewCategory {
                name,
                entry_type,
                icon,
            }),
            CategoryCommands::Edit {
                id,
                name,
                entry_type,
                icon,
            } => AppCommand::EditCategory(CategoryEdit {
                id,
                name,
                entry_type,
                icon,
            }),
            CategoryCommands::Delete { id } => AppCommand::DeleteCategory { id },
        }
    }
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::List => AppCommand::List,
            Commands::Balance => AppCommand::Balance,
            Commands::Add {
                entry_type,
                amount,
                category,
                note,
                image,
            } => AppCommand::Add(NewTransaction {
                entry_type,
                amount,
                category,
                note,
                image_uri: image,
            }),
            Commands::Edit {
                id,
                entry_type,
                amount,
                category,
                note,
                image,
            } => AppCommand::Edit(TransactionEdit {
                id,
                entry_type,
                amount,
                category,
                note,
                image_uri: image,
            }),
            Commands::Delete { id } => AppCommand::Delete { id },
            Commands::Category(sub) => sub.into(),
            Commands::Quote {
                symbols,
                range,
                interval,
            } => AppCommand::Quote {
                symbols,
                range,
                interval,
            },
            Commands::Reset { yes } => AppCommand::Reset { confirmed: yes },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => walletwatch::cli::setup::setup().map(|path| {
            println!("Created default configuration at {}", path.display());
        }),
        Some(cmd) => walletwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
