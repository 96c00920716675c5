use clap::{Parser, Subcommand};
use engine::extension::{
    ACTIVATE_ALL_THEMES, ACTIVATE_THEME, DEACTIVATE_ALL_THEMES, DEACTIVATE_THEME,
};
use std::path::PathBuf;

/// Activate and deactivate base16 editor themes
#[derive(Parser, Debug)]
#[command(name = "base16-activator", version, about, long_about = None)]
pub struct Cli {
    /// Path to an explicit config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Pick inactive themes to activate
    Activate,
    /// Pick active themes to deactivate
    Deactivate,
    /// Activate every theme in the catalog
    ActivateAll,
    /// Deactivate every theme
    DeactivateAll,
    /// List catalog themes, active ones marked with '*'
    List {
        /// Only active themes, in activation order
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Only inactive themes
        #[arg(long)]
        inactive: bool,
    },
    /// Bring the activation directory in line with the configured list
    Sync,
}

impl Commands {
    /// Registered command this subcommand triggers, if any
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            Commands::Activate => Some(ACTIVATE_THEME),
            Commands::Deactivate => Some(DEACTIVATE_THEME),
            Commands::ActivateAll => Some(ACTIVATE_ALL_THEMES),
            Commands::DeactivateAll => Some(DEACTIVATE_ALL_THEMES),
            Commands::List { .. } | Commands::Sync => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Commands::Activate => "activate",
            Commands::Deactivate => "deactivate",
            Commands::ActivateAll => "activate-all",
            Commands::DeactivateAll => "deactivate-all",
            Commands::List { .. } => "list",
            Commands::Sync => "sync",
        }
    }
}
