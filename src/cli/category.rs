//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::{PeculeError, PeculeResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Color as #RRGGBB
        #[arg(short, long)]
        color: String,
        /// Icon name
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color as #RRGGBB
        #[arg(short, long)]
        color: Option<String>,
        /// New icon name
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a category; its expenses become uncategorized
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PeculeResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Show { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| PeculeError::category_not_found(&category))?;
            print!("{}", format_category_details(&cat));
        }

        CategoryCommands::Create { name, color, icon } => {
            let category = service.create(&name, icon.as_deref(), &color)?;
            println!("Created category: {}", category.name);
            println!("  Color: {}", category.color);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            icon,
        } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| PeculeError::category_not_found(&category))?;

            if name.is_none() && color.is_none() && icon.is_none() {
                println!("No changes specified. Use --name, --color or --icon.");
                return Ok(());
            }

            let updated =
                service.update(cat.id, name.as_deref(), icon.as_deref(), color.as_deref())?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| PeculeError::category_not_found(&category))?;

            let deleted = service.delete(cat.id)?;
            println!("Deleted category: {}", deleted.category.name);
            if deleted.expenses_detached > 0 {
                println!(
                    "  {} expense(s) are now uncategorized",
                    deleted.expenses_detached
                );
            }
        }
    }

    Ok(())
}
