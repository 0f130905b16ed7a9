pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "revoice")]
#[command(about = "ReVoice CLI - Admin dashboard for recipients, games and access")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign up, sign out and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Dashboard home: total recipient count")]
    Home,

    #[command(about = "Recipients, their profiles and play history")]
    Recipients {
        #[command(subcommand)]
        cmd: commands::recipients::RecipientCommands,
    },

    #[command(about = "Custom games (per-recipient access)")]
    Custom {
        #[command(subcommand)]
        cmd: commands::levels::LevelCommands,
    },

    #[command(about = "Main games (available to every recipient)")]
    Main {
        #[command(subcommand)]
        cmd: commands::levels::LevelCommands,
    },

    #[command(about = "Custom game access grants")]
    Access {
        #[command(subcommand)]
        cmd: commands::access::AccessCommands,
    },

    #[command(about = "Navigation gate, menu and route contract")]
    Nav {
        #[command(subcommand)]
        cmd: commands::nav::NavCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Home => commands::home::handle(output_format).await,
        Commands::Recipients { cmd } => commands::recipients::handle(cmd, output_format).await,
        Commands::Custom { cmd } => {
            commands::levels::handle::<crate::views::CustomLevels>(cmd, output_format).await
        }
        Commands::Main { cmd } => commands::levels::handle::<crate::views::MainLevels>(cmd, output_format).await,
        Commands::Access { cmd } => commands::access::handle(cmd, output_format).await,
        Commands::Nav { cmd } => commands::nav::handle(cmd, output_format).await,
    }
}
