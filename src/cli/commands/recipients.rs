use clap::Subcommand;
use serde_json::json;

use super::page_index;
use crate::cli::config::CliContext;
use crate::cli::utils::{output_details, output_success, output_table, require_loaded, submit_failure};
use crate::cli::OutputFormat;
use crate::views::profile::{render_details, render_history_details};
use crate::views::{RecipientProfileView, RecipientsView};

const RECIPIENTS_PATH: &str = "/dashboard/recipients";

#[derive(Subcommand)]
pub enum RecipientCommands {
    #[command(about = "List recipients")]
    List {
        #[arg(long, help = "Page number (starting at 1)")]
        page: Option<u32>,
        #[arg(long, help = "Rows per page")]
        limit: Option<u32>,
    },

    #[command(about = "Add a recipient by game user id")]
    Add {
        #[arg(help = "Game user id")]
        game_user_id: String,
    },

    #[command(about = "Remove a recipient")]
    Remove {
        #[arg(help = "Game user id")]
        game_user_id: String,
    },

    #[command(about = "Show a recipient's details, streak and play history")]
    Show {
        #[arg(help = "Game user id")]
        game_user_id: String,
        #[arg(long, help = "History page number (starting at 1)")]
        page: Option<u32>,
    },

    #[command(about = "Show one play session with per-stage outcomes")]
    History {
        #[arg(help = "Game user id")]
        game_user_id: String,
        #[arg(help = "History entry id")]
        history_id: String,
    },
}

pub async fn handle(cmd: RecipientCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::bootstrap(output_format.clone())?;

    match cmd {
        RecipientCommands::List { page, limit } => {
            ctx.require_page(RECIPIENTS_PATH)?;
            let view = RecipientsView::new(&ctx.views_with_page_size(limit));
            require_loaded(view.list().go_to_page(page_index(page)).await)?;

            let snapshot = view.list().snapshot();
            output_table(&output_format, "recipients", &view.render(), json!(snapshot.rows))
        }
        RecipientCommands::Add { game_user_id } => {
            ctx.require_page(RECIPIENTS_PATH)?;
            let view = RecipientsView::new(&ctx.views());
            view.open_add_dialog();
            view.set_game_user_id(game_user_id);

            let response = view
                .submit_add()
                .await
                .map_err(|e| submit_failure(&output_format, e))?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or("Recipient added"),
                Some(json!({ "rowCount": view.list().row_count() })),
            )
        }
        RecipientCommands::Remove { game_user_id } => {
            ctx.require_page(RECIPIENTS_PATH)?;
            let view = RecipientsView::new(&ctx.views());
            let response = view
                .remove(&game_user_id)
                .await
                .map_err(|e| submit_failure(&output_format, e))?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or("Recipient removed"),
                Some(json!({ "rowCount": view.list().row_count() })),
            )
        }
        RecipientCommands::Show { game_user_id, page } => {
            ctx.require_page(&format!("{}/{}", RECIPIENTS_PATH, game_user_id))?;
            let view = RecipientProfileView::new(&ctx.views(), game_user_id);

            let (details, history) = view.mount().await;
            require_loaded(details)?;
            require_loaded(history)?;
            if page_index(page) > 0 {
                require_loaded(view.history().go_to_page(page_index(page)).await)?;
            }

            let details = view.details();
            let table = view.render_history();
            match output_format {
                OutputFormat::Json => output_details(
                    &output_format,
                    "",
                    json!({
                        "recipient": details,
                        "history": view.history().rows(),
                        "rowCount": table.row_count,
                        "page": table.page,
                        "pageCount": table.page_count,
                    }),
                ),
                OutputFormat::Text => {
                    if let Some(details) = &details {
                        println!("{}\n", render_details(details));
                    }
                    println!("History");
                    println!("{}", table.to_text());
                    Ok(())
                }
            }
        }
        RecipientCommands::History {
            game_user_id,
            history_id,
        } => {
            ctx.require_page(&format!("{}/{}", RECIPIENTS_PATH, game_user_id))?;
            let view = RecipientProfileView::new(&ctx.views(), game_user_id);
            require_loaded(view.open_history(&history_id).await)?;

            match view.history_details() {
                Some(details) => output_details(
                    &output_format,
                    &render_history_details(&details),
                    json!({ "history": details }),
                ),
                None => anyhow::bail!("history entry {} not found", history_id),
            }
        }
    }
}
