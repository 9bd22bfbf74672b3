use anyhow::Result;
use clap::{Parser, Subcommand};

use pecule::cli::{
    handle_backup_command, handle_category_command, handle_cycle_command, handle_expense_command,
    handle_export_command, handle_income_command, handle_report_command, handle_settings_command,
};
use pecule::config::{paths::PeculePaths, settings::Settings};
use pecule::setup::{Onboarding, SetupAnswers, SetupWizard};
use pecule::storage::Storage;

#[derive(Parser)]
#[command(
    name = "pecule",
    version,
    about = "Personal budget tracker, one cycle at a time",
    long_about = "Pécule tracks a budget cycle by cycle: start a cycle with an \
                  opening amount, record expenses and incomes, and watch the \
                  balance. Fixed entries carry over to the next cycle."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up Pécule and open the first budget cycle
    Init {
        /// First name used in greetings
        #[arg(short, long)]
        name: Option<String>,
        /// Opening amount of the first cycle
        #[arg(short, long)]
        amount: Option<String>,
        /// Start date of the first cycle (default: today)
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// Budget cycle commands
    #[command(subcommand)]
    Cycle(pecule::cli::CycleCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(pecule::cli::ExpenseCommands),

    /// Income commands
    #[command(subcommand)]
    Income(pecule::cli::IncomeCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(pecule::cli::CategoryCommands),

    /// Balance, history and alert reports
    #[command(subcommand)]
    Report(pecule::cli::ReportCommands),

    /// Export a cycle as CSV or as a report
    #[command(subcommand)]
    Export(pecule::cli::ExportCommands),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(pecule::cli::BackupCommands),

    /// User settings
    #[command(subcommand)]
    Settings(pecule::cli::SettingsCommands),

    /// Show recent changes from the audit log
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PeculePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init {
            name,
            amount,
            start,
        }) => {
            if !Onboarding::is_needed(&settings) {
                println!("Pécule is already set up at: {}", paths.base_dir().display());
                println!("Run 'pecule cycle start <amount>' to open a new cycle.");
                return Ok(());
            }

            let answers = SetupAnswers {
                first_name: name,
                amount,
                start_date: start,
            };
            let result = SetupWizard::new(&storage).run(&mut settings, answers)?;

            println!();
            println!("{}", settings.greeting());
            if result.categories_seeded > 0 {
                println!("Created {} default categories.", result.categories_seeded);
            }
            println!(
                "Opened cycle {} with {} ({})",
                result.cycle.id,
                result.cycle.amount.format_with_symbol(&settings.currency_symbol),
                result.cycle.period_label()
            );
            println!();
            println!("Record an expense with 'pecule expense add <label> <amount>'.");
        }
        Some(Commands::Config) => {
            println!("Pécule Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
        }
        Some(Commands::Cycle(cmd)) => handle_cycle_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Settings(cmd)) => handle_settings_command(&storage, &mut settings, cmd)?,
        Some(Commands::Log { count }) => {
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("Pécule - budget cycles from the terminal");
            println!();
            if Onboarding::is_needed(&settings) {
                println!("Run 'pecule init' to get started.");
            } else {
                println!("{}", settings.greeting());
                println!("Run 'pecule cycle current' to see your budget.");
            }
            println!("Run 'pecule --help' for usage information.");
        }
    }

    Ok(())
}
