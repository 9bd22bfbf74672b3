//! Settings CLI commands

use clap::Subcommand;

use crate::audit::EntityType;
use crate::config::settings::{Settings, Theme};
use crate::error::{PeculeError, PeculeResult};
use crate::services::validation::MAX_FIRST_NAME_LEN;
use crate::storage::{Storage, StoreEvent};

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the current settings
    Show,

    /// Change the first name used in greetings
    #[command(name = "set-name")]
    SetName {
        name: String,
    },

    /// Change the theme (auto, light or dark)
    #[command(name = "set-theme")]
    SetTheme {
        theme: Theme,
    },
}

fn save_settings(storage: &Storage, before: &Settings, after: &Settings) -> PeculeResult<()> {
    after.save(storage.paths())?;
    storage.log_update(EntityType::Settings, "settings", None, before, after)?;
    storage.publish(StoreEvent::SettingsChanged);
    Ok(())
}

/// Handle a settings command
pub fn handle_settings_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: SettingsCommands,
) -> PeculeResult<()> {
    match cmd {
        SettingsCommands::Show => {
            println!("Settings");
            println!("========");
            println!(
                "  First name: {}",
                if settings.first_name.is_empty() {
                    "(not set)"
                } else {
                    settings.first_name.as_str()
                }
            );
            println!("  Theme:      {}", settings.theme);
            println!("  Currency:   {}", settings.currency_symbol);
            println!(
                "  Backups:    {} recent, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
            println!(
                "  Setup:      {}",
                if settings.setup_completed { "completed" } else { "pending" }
            );
            println!("  File:       {}", storage.paths().settings_file().display());
        }

        SettingsCommands::SetName { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(PeculeError::Validation("First name is required".into()));
            }
            if name.chars().count() > MAX_FIRST_NAME_LEN {
                return Err(PeculeError::Validation(format!(
                    "First name must be at most {} characters",
                    MAX_FIRST_NAME_LEN
                )));
            }

            let before = settings.clone();
            settings.first_name = name.to_string();
            save_settings(storage, &before, settings)?;
            println!("{}", settings.greeting());
        }

        SettingsCommands::SetTheme { theme } => {
            let before = settings.clone();
            settings.theme = theme;
            save_settings(storage, &before, settings)?;
            println!("Theme set to {}", settings.theme);
        }
    }

    Ok(())
}
