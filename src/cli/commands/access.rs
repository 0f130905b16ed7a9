use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::{output_details, output_success, require_loaded, submit_failure};
use crate::cli::OutputFormat;
use crate::views::{AccessManager, CustomLevels, LevelCatalog};

#[derive(Subcommand)]
pub enum AccessCommands {
    #[command(about = "Show who has access to a custom game and who could be added")]
    List {
        #[arg(help = "Custom game id")]
        custom_level_id: String,
        #[arg(long, help = "Filter both lists by name")]
        search: Option<String>,
    },

    #[command(about = "Grant a recipient access to a custom game")]
    Grant {
        #[arg(help = "Custom game id")]
        custom_level_id: String,
        #[arg(help = "Recipient game user id")]
        recipient: String,
    },

    #[command(about = "Revoke a recipient's access to a custom game")]
    Revoke {
        #[arg(help = "Custom game id")]
        custom_level_id: String,
        #[arg(help = "Recipient game user id")]
        recipient: String,
    },
}

pub async fn handle(cmd: AccessCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::bootstrap(output_format.clone())?;
    ctx.require_page(CustomLevels::PAGE_PATH)?;

    match cmd {
        AccessCommands::List {
            custom_level_id,
            search,
        } => {
            let manager = AccessManager::new(&ctx.views(), custom_level_id);
            let (access, recipients) = manager.open().await;
            require_loaded(access)?;
            require_loaded(recipients)?;
            if let Some(search) = search {
                manager.set_search(search);
            }

            let with_access = manager.filtered_access();
            let available = manager.filtered_available();

            let mut text = vec!["Users with access:".to_string()];
            if with_access.is_empty() {
                text.push(format!("  {}", manager.access_empty_message()));
            }
            text.extend(
                with_access
                    .iter()
                    .map(|u| format!("  {}  {}", u.game_user_id, u.full_name())),
            );
            text.push(String::new());
            text.push("Available recipients:".to_string());
            if available.is_empty() {
                text.push(format!("  {}", manager.available_empty_message()));
            }
            text.extend(
                available
                    .iter()
                    .map(|r| format!("  {}  {}", r.game_user_id, r.full_name())),
            );

            output_details(
                &output_format,
                &text.join("\n"),
                json!({
                    "customLevelId": manager.custom_level_id(),
                    "access": with_access,
                    "available": available,
                }),
            )
        }
        AccessCommands::Grant {
            custom_level_id,
            recipient,
        } => {
            let manager = AccessManager::new(&ctx.views(), custom_level_id);
            let response = manager
                .grant(&recipient)
                .await
                .map_err(|e| submit_failure(&output_format, e))?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or("Access granted"),
                Some(json!({ "access": manager.access_list().len() })),
            )
        }
        AccessCommands::Revoke {
            custom_level_id,
            recipient,
        } => {
            let manager = AccessManager::new(&ctx.views(), custom_level_id);
            let response = manager
                .revoke(&recipient)
                .await
                .map_err(|e| submit_failure(&output_format, e))?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or("Access removed"),
                Some(json!({ "access": manager.access_list().len() })),
            )
        }
    }
}
