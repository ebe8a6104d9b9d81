use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use budgetbook::cli::{
    handle_audit_command, handle_backup_command, handle_budget_command, handle_category_command,
    handle_data_command, handle_export_command, handle_import_command, handle_render_command,
    handle_stats_command, handle_theme_command, handle_transaction_command,
};
use budgetbook::config::{BudgetbookPaths, Settings};
use budgetbook::error::{BudgetbookError, BudgetbookResult};
use budgetbook::storage::Storage;
use budgetbook::theme::load_theme;

#[derive(Parser)]
#[command(
    name = "budgetbook",
    version,
    about = "Personal income and expense tracker",
    long_about = "budgetbook records income and expense transactions, groups them into \
                  categories, tracks spending budgets and renders statistics, either in \
                  the terminal or as static HTML pages."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with default categories
    Init,

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(budgetbook::cli::TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(budgetbook::cli::CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(budgetbook::cli::BudgetCommands),

    /// Statistics and reports
    #[command(subcommand, alias = "statistics")]
    Stats(budgetbook::cli::StatsCommands),

    /// Export data to JSON or CSV
    #[command(subcommand)]
    Export(budgetbook::cli::ExportCommands),

    /// Import a JSON export, skipping records that already exist
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// Show what would be imported without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Render pages as static HTML
    Render(budgetbook::cli::RenderArgs),

    /// Theme for rendered pages
    #[command(subcommand)]
    Theme(budgetbook::cli::ThemeCommands),

    /// Data maintenance
    #[command(subcommand)]
    Data(budgetbook::cli::DataCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(budgetbook::cli::BackupCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths, optionally changing settings
    Config {
        /// Currency symbol shown before amounts
        #[arg(long)]
        currency: Option<String>,
        /// Budget usage percentage that triggers a warning
        #[arg(long)]
        threshold: Option<f64>,
        /// Number of recent transactions on the dashboard
        #[arg(long)]
        recent: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => Ok(()),
        Err(err) if err.is_user_error() => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("{}", err);
            Err(err.into())
        }
    }
}

fn run(cli: Cli) -> BudgetbookResult<()> {
    // Initialize paths and settings
    let paths = BudgetbookPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::open(&paths)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Initialized budgetbook at: {}", paths.base_dir().display());
            println!();
            println!(
                "{} categories are available.",
                storage.categories.count()?
            );
            println!("Run 'budgetbook category list' to see them.");
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Stats(cmd)) => {
            handle_stats_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Import { file, dry_run }) => {
            handle_import_command(&storage, &paths, &settings, &file, dry_run)?;
        }
        Some(Commands::Render(args)) => {
            handle_render_command(&storage, &settings, args)?;
        }
        Some(Commands::Theme(cmd)) => {
            handle_theme_command(&storage, cmd)?;
        }
        Some(Commands::Data(cmd)) => {
            handle_data_command(&storage, &paths, &settings, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &paths, &settings, cmd)?;
        }
        Some(Commands::Audit { count }) => {
            handle_audit_command(&storage, count)?;
        }
        Some(Commands::Config {
            currency,
            threshold,
            recent,
        }) => {
            let changed = currency.is_some() || threshold.is_some() || recent.is_some();

            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(threshold) = threshold {
                if !(0.0..=100.0).contains(&threshold) {
                    return Err(BudgetbookError::Validation(
                        "Alert threshold must be between 0 and 100".into(),
                    ));
                }
                settings.alert_threshold = threshold;
            }
            if let Some(recent) = recent {
                settings.recent_count = recent;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("budgetbook Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data store:       {}", paths.store_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Alert threshold:  {:.0}%", settings.alert_threshold);
            println!("  Recent count:     {}", settings.recent_count);
            println!("  Backups kept:     {}", settings.backup_retention.keep);
            println!("  Theme:            {}", load_theme(storage.store())?);
        }
        None => {
            println!("budgetbook - personal income and expense tracker");
            println!();
            println!("Run 'budgetbook --help' for usage information.");
            if !paths.is_initialized() {
                println!("Run 'budgetbook init' to get started.");
            }
        }
    }

    Ok(())
}
