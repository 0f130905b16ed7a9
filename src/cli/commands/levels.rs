use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use super::page_index;
use crate::api::models::LevelType;
use crate::cli::config::CliContext;
use crate::cli::utils::{output_details, output_success, output_table, require_loaded, submit_failure};
use crate::cli::OutputFormat;
use crate::forms::{LevelDraft, StageDraft};
use crate::views::levels::render_level_details;
use crate::views::{LevelCatalog, LevelsView};

#[derive(Subcommand)]
pub enum LevelCommands {
    #[command(about = "List games")]
    List {
        #[arg(long, help = "Page number (starting at 1)")]
        page: Option<u32>,
        #[arg(long, help = "Rows per page")]
        limit: Option<u32>,
    },

    #[command(about = "Show a game with its stages")]
    Show {
        #[arg(help = "Game id")]
        id: String,
    },

    #[command(about = "Create a game from flags or a YAML/JSON file")]
    Create {
        #[arg(long, help = "YAML or JSON file describing the game")]
        file: Option<PathBuf>,
        #[arg(long, help = "Game name")]
        name: Option<String>,
        #[arg(long = "type", help = "facial_detection, functional_speech or phoneme_practice")]
        level_type: Option<LevelType>,
        #[arg(long, help = "Subtype")]
        subtype: Option<String>,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long = "stage", help = "Stage target, repeat for each stage in order")]
        stages: Vec<String>,
    },

    #[command(about = "Delete a game")]
    Delete {
        #[arg(help = "Game id")]
        id: String,
    },
}

pub async fn handle<C: LevelCatalog>(cmd: LevelCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::bootstrap(output_format.clone())?;
    ctx.require_page(C::PAGE_PATH)?;
    if C::ADMIN_ONLY && !ctx.session.user().map_or(false, |u| u.is_admin()) {
        tracing::warn!(catalog = C::TITLE, "signed-in user is not an admin; the backend may refuse changes");
    }

    match cmd {
        LevelCommands::List { page, limit } => {
            let view = LevelsView::<C>::new(&ctx.views_with_page_size(limit));
            require_loaded(view.list().go_to_page(page_index(page)).await)?;
            output_table(&output_format, "levels", &view.render(), json!(view.list().rows()))
        }
        LevelCommands::Show { id } => {
            let view = LevelsView::<C>::new(&ctx.views());
            require_loaded(view.view_details(&id).await)?;
            let details = view
                .details()
                .ok_or_else(|| anyhow::anyhow!("game {} not found", id))?;
            output_details(&output_format, &render_level_details(&details), json!({ "level": details }))
        }
        LevelCommands::Create {
            file,
            name,
            level_type,
            subtype,
            description,
            stages,
        } => {
            let mut draft = match &file {
                Some(path) => {
                    let source = fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    LevelDraft::from_yaml(&source).with_context(|| format!("failed to parse {}", path.display()))?
                }
                None => LevelDraft {
                    stage: Vec::new(),
                    ..LevelDraft::default()
                },
            };
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(level_type) = level_type {
                draft.level_type = level_type;
            }
            if let Some(subtype) = subtype {
                draft.subtype = subtype;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            for target in stages {
                draft.add_stage(StageDraft::new(target));
            }

            let view = LevelsView::<C>::new(&ctx.views());
            let response = view
                .create(&draft)
                .await
                .map_err(|e| submit_failure(&output_format, e))?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or(C::CREATE_SUCCESS),
                Some(json!({ "stages": draft.stage.len() })),
            )
        }
        LevelCommands::Delete { id } => {
            let view = LevelsView::<C>::new(&ctx.views());
            let response = view
                .delete(&id)
                .await
                .map_err(|e| submit_failure(&output_format, e))?;
            output_success(
                &output_format,
                response.message.as_deref().unwrap_or("Game removed"),
                Some(json!({ "rowCount": view.list().row_count() })),
            )
        }
    }
}
