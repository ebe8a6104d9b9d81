//! Theme CLI commands

use clap::Subcommand;

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::storage::Storage;
use crate::theme::{load_theme, save_theme, Theme, ThemeChoice};

/// Theme subcommands
#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Show the saved theme
    Show,

    /// Save a theme for rendered pages
    Set {
        /// light, dark, blue, green, purple, orange or auto
        theme: String,
    },

    /// List available themes
    List,
}

/// Handle a theme command
pub fn handle_theme_command(storage: &Storage, cmd: ThemeCommands) -> BudgetbookResult<()> {
    match cmd {
        ThemeCommands::Show => {
            let choice = load_theme(storage.store())?;
            match choice {
                ThemeChoice::Auto => println!("Theme: auto (follows --dark when rendering)"),
                ThemeChoice::Fixed(theme) => {
                    println!("Theme: {} ({})", theme.display_name(), theme.key())
                }
            }
        }

        ThemeCommands::Set { theme } => {
            let choice: ThemeChoice = theme.parse().map_err(BudgetbookError::Validation)?;
            save_theme(storage.store(), choice)?;
            println!("Theme set to {}", choice);
        }

        ThemeCommands::List => {
            let current = load_theme(storage.store())?;
            for theme in Theme::all() {
                let marker = if current == ThemeChoice::Fixed(theme) { "*" } else { " " };
                println!(
                    "{} {:<8} {:<8} {}",
                    marker,
                    theme.key(),
                    theme.display_name(),
                    theme.accent()
                );
            }
            let marker = if current == ThemeChoice::Auto { "*" } else { " " };
            println!("{} {:<8} Follow system", marker, "auto");
        }
    }

    Ok(())
}
